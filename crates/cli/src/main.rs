use clap::{Parser, Subcommand};
use intake_core::constants::TOTP_DEFAULT_SKEW;
use intake_core::{
    IntakeConfig, SecretStore, TotpPolicy, TotpVerifier, DEFAULT_SECRET_FILE, DEFAULT_UPLOAD_DIR,
    MAX_UPLOAD_BYTES,
};
use intake_files::UploadPipeline;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "intake")]
#[command(about = "Intake operator CLI: TOTP secret provisioning and upload store inspection")]
struct Cli {
    /// TOTP secret record
    #[arg(long, global = true, env = "TOTP_SECRET_FILE", default_value = DEFAULT_SECRET_FILE)]
    secret_file: PathBuf,

    /// Upload storage directory
    #[arg(long, global = true, env = "UPLOAD_DIR", default_value = DEFAULT_UPLOAD_DIR)]
    upload_dir: PathBuf,

    /// Adjacent time steps accepted on either side of the current one
    #[arg(long, global = true, env = "TOTP_SKEW", default_value_t = TOTP_DEFAULT_SKEW)]
    skew: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the secret, creating it if missing, and print enrolment details
    Provision,
    /// Print the current one-time code
    Code,
    /// Check whether a code is valid right now
    Verify {
        /// Six-digit code
        code: String,
    },
    /// List stored uploads
    List,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let cfg = IntakeConfig::new(
        cli.secret_file,
        cli.upload_dir,
        MAX_UPLOAD_BYTES,
        TotpPolicy::with_skew(cli.skew)?,
    )?;
    let store = SecretStore::new(cfg.secret_file());

    match cli.command {
        Some(Commands::Provision) => {
            let provisioned = store.load_or_generate()?;
            let verifier = TotpVerifier::new(provisioned.secret(), cfg.totp_policy().clone())?;
            if provisioned.was_generated() {
                println!("Generated new secret at {}", store.path().display());
            } else {
                println!("Loaded secret from {}", store.path().display());
            }
            println!("Secret: {}", provisioned.secret().as_base32());
            println!("URL:    {}", verifier.provisioning_url());
        }
        Some(Commands::Code) => {
            let verifier = TotpVerifier::new(&store.load()?, cfg.totp_policy().clone())?;
            println!("{}", verifier.current_code());
        }
        Some(Commands::Verify { code }) => {
            let verifier = TotpVerifier::new(&store.load()?, cfg.totp_policy().clone())?;
            if verifier.validate(code.trim()) {
                println!("valid");
            } else {
                println!("invalid");
                std::process::exit(1);
            }
        }
        Some(Commands::List) => {
            let pipeline = UploadPipeline::new(cfg.upload_dir(), cfg.max_upload_bytes());
            let stored = pipeline.list()?;
            if stored.is_empty() {
                println!("No uploads found.");
            } else {
                for file in stored {
                    println!("{}  {} bytes", file.storage_name, file.size_bytes);
                }
            }
        }
        None => {
            println!("No command given. Try `intake --help`.");
        }
    }

    Ok(())
}
