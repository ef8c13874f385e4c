//! Rule tables of the messenger requests.
//!
//! Field order in each table is the order in which violations are reported.
//! Requests carrying only an identifier have no rules: a missing identifier is a
//! precondition failure checked by the API services.

use crate::messaging::{
    api::types::{
        AccountsRequest, Attachment, Credentials, Email, GatewayRequest, MailerRequest, NewUser,
        ProfileUpdate, Registration,
    },
    validation::{
        Validate, Violation,
        rules::{FieldRules, Rule, RuleSet},
    },
};

const USERNAME: &[Rule] = &[Rule::Required, Rule::Length { min: 3, max: 32 }, Rule::Identifier];
const EMAIL: &[Rule] = &[Rule::Required, Rule::max_len(254), Rule::EmailShape];
const PASSWORD: &[Rule] =
    &[Rule::Required, Rule::Length { min: 8, max: 64 }, Rule::PasswordStrength];

/// Maximum attachment size, in bytes.
pub const MAX_ATTACHMENT_SIZE: usize = 10 * 1024 * 1024;

static REGISTRATION_RULES: RuleSet<Registration> = RuleSet(&[
    FieldRules { field: "username", extract: |r| (&r.username).into(), rules: USERNAME },
    FieldRules { field: "email", extract: |r| (&r.email).into(), rules: EMAIL },
    FieldRules { field: "password", extract: |r| (&r.password).into(), rules: PASSWORD },
]);

// Stored passwords are not re-judged against the strength rule at login
static CREDENTIALS_RULES: RuleSet<Credentials> = RuleSet(&[
    FieldRules {
        field: "email",
        extract: |c| (&c.email).into(),
        rules: &[Rule::Required, Rule::EmailShape],
    },
    FieldRules {
        field: "password",
        extract: |c| (&c.password).into(),
        rules: &[Rule::Required, Rule::Length { min: 8, max: 64 }],
    },
]);

static NEW_USER_RULES: RuleSet<NewUser> = RuleSet(&[
    FieldRules { field: "username", extract: |u| (&u.username).into(), rules: USERNAME },
    FieldRules { field: "email", extract: |u| (&u.email).into(), rules: EMAIL },
    FieldRules {
        field: "name",
        extract: |u| (&u.name).into(),
        rules: &[Rule::Required, Rule::Length { min: 1, max: 64 }],
    },
]);

static PROFILE_UPDATE_RULES: RuleSet<ProfileUpdate> = RuleSet(&[
    FieldRules { field: "username", extract: |p| (&p.username).into(), rules: USERNAME },
    FieldRules { field: "name", extract: |p| (&p.name).into(), rules: &[Rule::max_len(64)] },
]);

static EMAIL_RULES: RuleSet<Email> = RuleSet(&[
    FieldRules { field: "to", extract: |e| (&e.to).into(), rules: EMAIL },
    FieldRules {
        field: "subject",
        extract: |e| (&e.subject).into(),
        rules: &[Rule::Required, Rule::Length { min: 1, max: 255 }],
    },
    FieldRules { field: "body", extract: |e| (&e.body).into(), rules: &[Rule::Required] },
]);

static ATTACHMENT_RULES: RuleSet<Attachment> = RuleSet(&[
    FieldRules {
        field: "filename",
        extract: |a| (&a.filename).into(),
        rules: &[Rule::Required, Rule::Length { min: 1, max: 255 }],
    },
    FieldRules {
        field: "content",
        extract: |a| a.content.as_slice().into(),
        rules: &[Rule::Required, Rule::max_len(MAX_ATTACHMENT_SIZE)],
    },
]);

impl Validate for Registration {
    fn violations(&self) -> Vec<Violation> {
        REGISTRATION_RULES.evaluate(self)
    }
}

impl Validate for Credentials {
    fn violations(&self) -> Vec<Violation> {
        CREDENTIALS_RULES.evaluate(self)
    }
}

impl Validate for NewUser {
    fn violations(&self) -> Vec<Violation> {
        NEW_USER_RULES.evaluate(self)
    }
}

impl Validate for ProfileUpdate {
    fn violations(&self) -> Vec<Violation> {
        PROFILE_UPDATE_RULES.evaluate(self)
    }
}

impl Validate for Email {
    fn violations(&self) -> Vec<Violation> {
        EMAIL_RULES.evaluate(self)
    }
}

impl Validate for AccountsRequest {
    fn violations(&self) -> Vec<Violation> {
        match self {
            AccountsRequest::Register(registration) => registration.violations(),
            AccountsRequest::Login(credentials) => credentials.violations(),
            AccountsRequest::CreateUser(user) => user.violations(),
            AccountsRequest::UpdateProfile(update) => update.violations(),
            AccountsRequest::GetProfile { .. }
            | AccountsRequest::GetUser { .. }
            | AccountsRequest::DeleteProfile { .. } => Vec::new(),
        }
    }
}

impl Validate for GatewayRequest {
    fn violations(&self) -> Vec<Violation> {
        match self {
            GatewayRequest::Accounts(request) => request.violations(),
            GatewayRequest::RefreshToken | GatewayRequest::Logout => Vec::new(),
        }
    }
}

impl Validate for MailerRequest {
    fn violations(&self) -> Vec<Violation> {
        match self {
            MailerRequest::SendEmail(email) => email.violations(),
            MailerRequest::SendEmailWithAttachment { email, attachments } => {
                let mut violations = email.violations();
                if attachments.is_empty() {
                    violations.push(Violation::new("attachments", "value is required"));
                }
                for (i, attachment) in attachments.iter().enumerate() {
                    ATTACHMENT_RULES.evaluate_into(
                        attachment,
                        &format!("attachments[{i}]."),
                        &mut violations,
                    );
                }
                violations
            }
        }
    }
}
