//! upiqr command-line entrypoint

use anyhow::Context;
use clap::Parser;
use serde_json::json;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use upiqr::output::{Notification, NotificationKind};
use upiqr::{
    ConsoleNotifier, DirectorySaver, GeneratedCode, Notifier, Session, UpiqrConfig,
    export, logging, share,
};

#[derive(Parser, Debug)]
#[command(
    name = "upiqr",
    version,
    about = "Generate, save and share UPI payment QR codes"
)]
struct Cli {
    /// Payee UPI ID (e.g. yourname@paytm). Prompted for when omitted.
    #[arg(long, value_name = "ID")]
    upi_id: Option<String>,

    /// Amount in rupees. Prompted for when omitted.
    #[arg(long, value_name = "AMOUNT", allow_hyphen_values = true)]
    amount: Option<String>,

    /// Save the QR code as UPI-QR-<id>-<amount>.png
    #[arg(long)]
    download: bool,

    /// Share the QR code image, or copy the payment link when file sharing is unavailable
    #[arg(long)]
    share: bool,

    /// Also write the QR code as an SVG document
    #[arg(long, value_name = "PATH")]
    svg: Option<PathBuf>,

    /// Directory for downloaded images (overrides configuration)
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Output notifications and results as JSON lines
    #[arg(long)]
    json: bool,

    /// Do not draw the QR code in the terminal
    #[arg(long)]
    quiet: bool,

    /// Optional configuration file (toml/yaml). Defaults to upiqr.{toml,yaml} in cwd/XDG config.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = UpiqrConfig::load(cli.config.as_deref())?;
    if let Some(ref dir) = cli.output_dir {
        config.export.output_dir = dir.clone();
    }

    logging::init(&config.logging)?;

    let notifier = ConsoleNotifier::new(cli.json);
    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let mut session = Session::new();

    let identifier = match cli.upi_id.clone() {
        Some(id) => id,
        None => prompt(&mut input, "UPI ID (e.g. yourname@paytm): ").await?,
    };
    session.set_identifier(identifier);

    let amount = match cli.amount.clone() {
        Some(amount) => amount,
        None => prompt(&mut input, "Amount (₹): ").await?,
    };
    session.set_amount(amount);

    let notification = session.generate();
    notifier.notify(&notification);

    let Some(code) = session.generated() else {
        return Ok(ExitCode::FAILURE);
    };
    print_code(&cli, &session, code);

    if let Some(ref path) = cli.svg {
        tokio::fs::write(path, code.barcode.to_svg())
            .await
            .with_context(|| format!("Failed to write SVG to {}", path.display()))?;
        tracing::info!(path = %path.display(), "Wrote SVG QR code");
    }

    let mut failed = false;

    if cli.download {
        let saver = DirectorySaver::new(&config.export.output_dir);
        match export::export(&session, &saver).await {
            Ok(Some(saved)) => {
                if cli.json {
                    println!(
                        "{}",
                        json!({
                            "saved": saved.path,
                            "file_name": saved.file_name,
                            "width": saved.image.width,
                            "height": saved.image.height,
                        })
                    );
                } else {
                    println!("Saved QR code to {}", saved.path.display());
                }
            }
            Ok(None) => {}
            Err(err) => {
                tracing::warn!("Failed to save QR code: {err}");
                notifier.notify(&Notification::new(NotificationKind::ExportFailed));
                failed = true;
            }
        }
    }

    if cli.share {
        if let Some(outcome) = share::share_with_options(&session, &config.share).await {
            notifier.notify(&outcome);
            failed |= outcome.is_error();
        }
    }

    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn print_code(cli: &Cli, session: &Session, code: &GeneratedCode) {
    if cli.json {
        println!(
            "{}",
            json!({
                "link": code.link.as_str(),
                "upi_id": session.identifier(),
                "amount": session.amount(),
                "size": code.barcode.size(),
            })
        );
        return;
    }

    if !cli.quiet {
        println!();
        print!("{}", code.barcode.to_terminal());
        println!();
    }
    println!("UPI ID: {}", session.identifier());
    println!("Amount: ₹{}", session.amount());
    println!("Link:   {}", code.link);
}

async fn prompt(input: &mut Lines<BufReader<Stdin>>, label: &str) -> anyhow::Result<String> {
    eprint!("{label}");
    let line = input
        .next_line()
        .await
        .context("Failed to read from stdin")?
        .unwrap_or_default();
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
