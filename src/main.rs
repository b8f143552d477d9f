use bank_assist::config::{Command, InfoTopic};
use bank_assist::core::assistant::health_status;
use bank_assist::core::info;
use bank_assist::core::ConfigProvider;
use bank_assist::domain::ports::GenerativeBackend;
use bank_assist::utils::error::ErrorSeverity;
use bank_assist::utils::{logger, validation::Validate};
use bank_assist::{
    AssistError, BankAssistant, CliConfig, CsvAccountStore, GeminiClient, GenerativeFallback,
    ResponseResolver, Result, TomlConfig,
};
use clap::Parser;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::debug!("Starting bank-assist CLI");

    if let Err(e) = run(cli).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::debug!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = match e.severity() {
            ErrorSeverity::Low => 4,      // 輸入或查無帳戶
            ErrorSeverity::Medium => 2,   // 可重試
            ErrorSeverity::High => 1,     // 設定錯誤
            ErrorSeverity::Critical => 3, // 資料來源錯誤
        };
        std::process::exit(exit_code);
    }
}

async fn run(cli: CliConfig) -> Result<()> {
    let settings: Box<dyn ConfigProvider> = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            let config = TomlConfig::from_file(path)?;
            config.validate()?;
            Box::new(config)
        }
        None => {
            cli.validate()?;
            Box::new(cli.clone())
        }
    };

    let backend = GeminiClient::from_config(settings.as_ref())
        .map(|client| Arc::new(client) as Arc<dyn GenerativeBackend>);
    let resolver = ResponseResolver::with_fallback(GenerativeFallback::new(backend));

    match cli.command {
        Command::Health => print_json(&health_status(resolver.generative_available())),
        Command::Info { topic } => match topic {
            InfoTopic::Loans => print_json(&info::loan_info()),
            InfoTopic::Branches => print_json(&info::branch_info()),
            InfoTopic::Contact => print_json(&info::contact_info()),
        },
        Command::Login { mobile } => {
            let store = CsvAccountStore::from_path(settings.accounts_path())?;
            let assistant = build_assistant(settings.as_ref(), store, resolver);
            print_json(&assistant.login(&mobile).await?)
        }
        Command::Account { mobile } => {
            let store = CsvAccountStore::from_path(settings.accounts_path())?;
            let assistant = build_assistant(settings.as_ref(), store, resolver);
            print_json(&assistant.account_details(&mobile).await?)
        }
        Command::Ask {
            query,
            mobile,
            show_stage,
        } => {
            // accounts are only needed when personalising
            let store = match &mobile {
                Some(_) => CsvAccountStore::from_path(settings.accounts_path())?,
                None => CsvAccountStore::default(),
            };
            let assistant = build_assistant(settings.as_ref(), store, resolver);
            let context = match mobile {
                Some(mobile) => Some(assistant.login(&mobile).await?.to_context()),
                None => None,
            };

            let resolution = assistant.ask(&query, context.as_ref()).await?;
            if show_stage {
                println!("[{}]", resolution.stage);
            }
            println!("{}", resolution.response);
            Ok(())
        }
    }
}

fn build_assistant(
    settings: &dyn ConfigProvider,
    store: CsvAccountStore,
    resolver: ResponseResolver,
) -> BankAssistant<CsvAccountStore> {
    BankAssistant::new(
        store,
        resolver,
        Duration::from_secs(settings.request_timeout_seconds()),
    )
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(AssistError::SerializationError)?;
    println!("{}", json);
    Ok(())
}
