use clap::{Parser, Subcommand};
use healthchain_dashboard::api::{ApiService, SharedGateway};
use healthchain_dashboard::blockchain::{LocalWalletAdapter, WalletHandle};
use healthchain_dashboard::config::{load_config, Settings};
use healthchain_dashboard::display::{AdaptiveIdentifier, CopyableIdentifier, LayoutMetrics, StdoutClipboard};
use healthchain_dashboard::models::{
    Consent, ConsentFilter, ConsentPurpose, PatientQuery, StatusFilter, Transaction,
};
use healthchain_dashboard::services::{
    ConsentManager, PatientDetail, PatientList, StatsDashboard, TransactionHistory,
};
use healthchain_dashboard::services::patients::shows_pagination;
use healthchain_dashboard::utils::format::{
    confirmation_glyph, format_date, format_date_long, format_date_short, format_wallet_address,
    record_type_class, status_class, transaction_type_class,
};
use std::io::{BufRead, Write};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

// Columns given to addresses and hashes in table output
const ID_COLUMNS: usize = 19;

/// healthchain - Health Chains dashboard client
#[derive(Parser, Debug)]
#[command(name = "healthchain")]
#[command(about = "Browse patients, manage wallet-signed consents and inspect transactions", long_about = None)]
#[command(version)]
struct Cli {
    /// gateway root, overrides API_BASE_URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// tracing filter, overrides LOG_LEVEL
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// show aggregate statistics
    Stats,

    /// list patients
    Patients {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value = "")]
        search: String,
    },

    /// show one patient with their records
    Patient { id: String },

    /// list consents
    Consents {
        /// all, active or pending
        #[arg(long, default_value = "all")]
        status: String,
        #[arg(long)]
        patient: Option<String>,
    },

    /// create, approve or revoke a consent
    #[command(subcommand)]
    Consent(ConsentCommand),

    /// list blockchain transactions
    Transactions {
        /// include transactions of every wallet
        #[arg(long)]
        all: bool,
        #[arg(long)]
        limit: Option<u32>,
    },

    /// show the connected wallet
    Wallet,

    /// render an identifier in a given width
    Identifier {
        value: String,
        /// available width in pixels
        #[arg(long, default_value_t = 160.0)]
        width: f64,
        /// width of one character in pixels
        #[arg(long, default_value_t = 8.0)]
        char_width: f64,
        #[arg(long)]
        min_chars: Option<usize>,
        /// write the full identifier to stdout as the clipboard
        #[arg(long)]
        copy: bool,
    },
}

#[derive(Subcommand, Debug)]
enum ConsentCommand {
    /// sign and submit a new consent
    Create {
        #[arg(long)]
        patient: String,
        #[arg(long)]
        purpose: String,
        /// sign without asking
        #[arg(long)]
        yes: bool,
    },
    /// approve a pending consent
    Approve { id: String },
    /// revoke a pending consent
    Revoke { id: String },
}

fn confirm_on_stdin(message: &str) -> bool {
    print!("Sign message \"{}\"? [y/N] ", message);
    if std::io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    match std::io::stdin().lock().read_line(&mut answer) {
        Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}

async fn build_wallet(settings: &Settings, auto_approve: bool) -> anyhow::Result<WalletHandle> {
    let mut adapter = LocalWalletAdapter::new(settings.wallet_private_key.as_deref())?;
    if !auto_approve {
        adapter = adapter.with_approval(Arc::new(confirm_on_stdin));
    }
    let wallet = adapter.into_handle();

    if settings.wallet_private_key.is_some() {
        wallet.connect().await?;
    }
    Ok(wallet)
}

fn short_id(value: &str, min_chars: usize) -> String {
    let mut id = AdaptiveIdentifier::new(value).with_min_chars(min_chars);
    id.relayout(&LayoutMetrics::monospace(ID_COLUMNS)).to_string()
}

fn print_consent(consent: &Consent, min_chars: usize) {
    let class = status_class(consent.status.as_str()).unwrap_or("-");
    println!(
        "{:<24} {:<12} {:<10} {:<36} {:<20} {}",
        consent.id,
        consent.patient_id,
        class,
        consent.purpose,
        consent.wallet_address.as_deref().map(|a| short_id(a, min_chars)).unwrap_or_default(),
        format_date(consent.created_at.as_deref()),
    );
}

fn print_transaction(tx: &Transaction, min_chars: usize) {
    let amount = tx
        .amount_display()
        .map(|a| format!("{} {}", a, tx.currency()))
        .unwrap_or_default();
    println!(
        "{} {:<18} {:<20} {:<20} {:<14} {}",
        confirmation_glyph(tx.is_confirmed()),
        transaction_type_class(tx.tx_type.as_deref()),
        tx.from.as_deref().map(|a| short_id(a, min_chars)).unwrap_or_default(),
        tx.to.as_deref().map(|a| short_id(a, min_chars)).unwrap_or_default(),
        amount,
        format_date(tx.occurred_at()),
    );
    if let Some(hash) = tx.blockchain_tx_hash.as_deref() {
        println!("    tx {}", short_id(hash, min_chars));
    }
}

async fn run(command: Command, settings: Settings, gateway: SharedGateway) -> anyhow::Result<()> {
    let min_chars = settings.identifier_min_chars;

    match command {
        Command::Stats => {
            let stats = StatsDashboard::new(gateway).load().await?;
            for item in stats.items() {
                let marker = if item.primary { "*" } else { " " };
                println!("{} {:<20} {:>8}  {}", marker, item.label, item.value, item.description);
            }
        }

        Command::Patients { page, search } => {
            let query = PatientQuery {
                page,
                limit: settings.patients_page_size,
                search,
            };
            let list = PatientList::with_query(gateway, query);
            list.mount().await?;

            let state = list.state().await;
            if let Some(error) = state.error {
                anyhow::bail!(error);
            }
            if state.items.is_empty() {
                println!("No patients found");
            }
            for patient in &state.items {
                println!(
                    "{:<14} {:<28} {:<32} {}",
                    patient.id,
                    patient.name,
                    patient.email.as_deref().unwrap_or(""),
                    format_date_short(patient.date_of_birth.as_deref()),
                );
            }
            if let Some(pagination) = state.pagination.as_ref().filter(|p| shows_pagination(Some(p))) {
                println!(
                    "Page {} of {} ({} patients){}{}",
                    state.filter.page,
                    pagination.total_pages,
                    pagination.total,
                    if list.can_go_previous().await { "  --page N-1 for previous" } else { "" },
                    if list.can_go_next().await { "  --page N+1 for next" } else { "" },
                );
            }
        }

        Command::Patient { id } => {
            let detail = PatientDetail::load(&gateway, &id).await?;
            let patient = &detail.patient;
            println!("{} ({})", patient.name, patient.id);
            println!("  Date of birth: {}", format_date_long(patient.date_of_birth.as_deref()));
            for (label, value) in [
                ("Email", &patient.email),
                ("Gender", &patient.gender),
                ("Phone", &patient.phone),
                ("Address", &patient.address),
            ] {
                println!("  {}: {}", label, value.as_deref().unwrap_or("N/A"));
            }
            if let Some(wallet) = patient.wallet_address.as_deref() {
                println!("  Wallet: {}", short_id(wallet, min_chars));
            }

            println!("Records ({})", detail.records.len());
            for record in &detail.records {
                println!(
                    "  [{}] {} - {} ({})",
                    record_type_class(record.record_type.as_deref()).unwrap_or("other"),
                    record.title.as_deref().unwrap_or("Untitled"),
                    format_date(record.date.as_deref().or(record.created_at.as_deref())),
                    record.status.as_deref().unwrap_or("unknown"),
                );
            }
        }

        Command::Consents { status, patient } => {
            let filter = ConsentFilter {
                patient_id: patient,
                status: StatusFilter::parse(&status),
            };
            let wallet = build_wallet(&settings, true).await?;
            let manager = ConsentManager::with_filter(gateway, wallet, filter);
            manager.mount().await?;

            let state = manager.state().await;
            if let Some(error) = state.error {
                anyhow::bail!(error);
            }
            if state.items.is_empty() {
                println!("No consents found");
            }
            for consent in &state.items {
                print_consent(consent, min_chars);
                let actions = manager.actions_for(consent).await;
                if !actions.is_empty() {
                    println!("    pending: `consent approve {0}` or `consent revoke {0}`", consent.id);
                }
            }
        }

        Command::Consent(ConsentCommand::Create { patient, purpose, yes }) => {
            if ConsentPurpose::parse(&purpose).is_none() {
                let known: Vec<&str> = ConsentPurpose::ALL.iter().map(|p| p.as_str()).collect();
                warn!(purpose = %purpose, "Unknown consent purpose");
                anyhow::bail!("Purpose must be one of: {}", known.join(", "));
            }

            let wallet = build_wallet(&settings, yes).await?;
            let manager = ConsentManager::new(gateway, wallet);
            manager.toggle_form().await;
            manager.set_patient_id(&patient).await;
            manager.set_purpose(&purpose).await;

            let consent = manager.create().await?;
            println!("Consent {} created with status {}", consent.id, consent.status);
        }

        Command::Consent(ConsentCommand::Approve { id }) => {
            let wallet = build_wallet(&settings, true).await?;
            let consent = ConsentManager::new(gateway, wallet).approve(&id).await?;
            println!("Consent {} is now {}", consent.id, consent.status);
        }

        Command::Consent(ConsentCommand::Revoke { id }) => {
            let wallet = build_wallet(&settings, true).await?;
            let consent = ConsentManager::new(gateway, wallet).revoke(&id).await?;
            println!("Consent {} is now {}", consent.id, consent.status);
        }

        Command::Transactions { all, limit } => {
            let wallet = build_wallet(&settings, true).await?;
            let history = TransactionHistory::new(
                gateway,
                wallet,
                limit.unwrap_or(settings.transactions_limit),
            );
            if all {
                history.set_scope(false).await?;
            }
            history.mount().await?;

            let state = history.state().await;
            if let Some(error) = state.error {
                anyhow::bail!(error);
            }
            let label = if history.can_toggle_scope().await {
                history.scope_label()
            } else {
                "All Transactions"
            };
            println!("{} ({})", label, state.items.len());
            for tx in &state.items {
                print_transaction(tx, min_chars);
            }
        }

        Command::Wallet => {
            let wallet = build_wallet(&settings, true).await?;
            match wallet.current_account().await {
                Some(account) => println!("Connected: {} ({})", format_wallet_address(&account), account),
                None => println!("No wallet connected. Set WALLET_PRIVATE_KEY to connect."),
            }
        }

        Command::Identifier {
            value,
            width,
            char_width,
            min_chars: min_override,
            copy,
        } => {
            let metrics = LayoutMetrics {
                parent_width: width,
                slack: 0.0,
                gap: Some(0.0),
                sample_width: char_width * 10.0,
                ..LayoutMetrics::default()
            };
            let mut identifier = AdaptiveIdentifier::new(value).with_min_chars(min_override.unwrap_or(min_chars));
            println!("{}", identifier.relayout(&metrics));

            if copy {
                let mut copyable = CopyableIdentifier::new(identifier, Arc::new(StdoutClipboard))
                    .with_feedback(settings.copied_feedback());
                if copyable.copy().await {
                    eprintln!("Copied!");
                }
            }
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration, .env included
    let mut settings = load_config()?;
    if let Some(api_url) = cli.api_url {
        settings.api_base_url = api_url;
    }
    if let Some(log_level) = cli.log_level {
        settings.log_level = log_level;
    }

    // Initialize tracing; RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&settings.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(settings.is_development())
        .with_ansi(!settings.is_production())
        .with_writer(std::io::stderr)
        .init();

    info!(app = %settings.app_name, environment = ?settings.environment, gateway = %settings.api_base_url, "Configuration loaded");

    let gateway: SharedGateway = Arc::new(ApiService::new(&settings.api_base_url, settings.api_timeout())?);

    run(cli.command, settings, gateway).await
}
