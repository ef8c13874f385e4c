use std::{env, path::PathBuf};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let out_dir = PathBuf::from(env::var("OUT_DIR")?);
    tonic_build::configure()
        .file_descriptor_set_path(out_dir.join("messenger_descriptor.bin"))
        .compile_protos(
            &[
                "proto/users.proto",
                "proto/accounts.proto",
                "proto/api_gateway.proto",
                "proto/mailer.proto",
            ],
            &["proto"],
        )?;
    Ok(())
}
