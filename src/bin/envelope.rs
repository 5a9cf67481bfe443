use clap::{Parser, Subcommand};
use onepager::utils::cipher;
use onepager::utils::logger;
use onepager::OnePagerError;

#[derive(Parser)]
#[command(name = "envelope")]
#[command(about = "Encrypt or decrypt seed based hex envelopes")]
struct Args {
    /// Seed the AES key is derived from
    #[arg(long, env = "ONEPAGER_SEED", hide_env_values = true)]
    seed: String,

    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print `hex(iv):hex(ciphertext)` for the plaintext
    Encrypt { plaintext: String },
    /// Print the plaintext of an envelope
    Decrypt { envelope: String },
}

fn main() {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose);

    let outcome = match &args.command {
        Command::Encrypt { plaintext } => cipher::encrypt(plaintext, &args.seed),
        Command::Decrypt { envelope } => cipher::decrypt(envelope.trim(), &args.seed),
    };

    match outcome {
        Ok(output) => println!("{}", output),
        Err(e) => {
            let error = OnePagerError::from(e);
            tracing::error!("❌ {}", error);
            eprintln!("❌ {}", error.user_friendly_message());
            eprintln!("💡 建議: {}", error.recovery_suggestion());
            std::process::exit(error.exit_code());
        }
    }
}
