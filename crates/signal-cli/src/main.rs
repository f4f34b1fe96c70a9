//! OTC 시그널 봇 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 봇 실행 (config/default.toml + 환경 변수)
//! signal-bot run
//!
//! # 설정 검증
//! signal-bot check-config -c config/production.toml
//!
//! # USD 통화쌍 확인
//! signal-bot symbols --search usd
//! ```

use clap::{Parser, Subcommand};
use signal_core::{init_logging, BotConfig, LogConfig, SymbolRoster, DEFAULT_CONFIG_PATH};
use signal_cli::commands::{describe_config, render_symbols, run_bot};

#[derive(Parser)]
#[command(name = "signal-bot")]
#[command(about = "OTC signal Telegram bot - 시그널 버튼 및 관리자 브로드캐스트", long_about = None)]
#[command(version)]
struct Cli {
    /// 설정 파일 (없으면 환경 변수만 사용)
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 봇 실행 (long polling)
    Run {
        /// 로그 레벨 (설정 파일 값보다 우선, RUST_LOG가 있으면 RUST_LOG 우선)
        #[arg(long)]
        log_level: Option<String>,
    },

    /// 설정 검증 후 요약 출력 (토큰은 가려짐)
    CheckConfig,

    /// 심볼 목록 및 콜백 데이터 출력
    Symbols {
        /// 검색 키워드 (대소문자 무시)
        #[arg(short, long)]
        search: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 파일 로드 (있는 경우)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { log_level } => {
            let config = BotConfig::load(&cli.config)?;
            let mut log_config = LogConfig::from_settings(&config.logging);
            if let Some(level) = log_level {
                log_config.level = level;
            }
            init_logging(log_config).map_err(|e| anyhow::anyhow!("로깅 초기화 실패: {e}"))?;

            run_bot(config).await?;
        }
        Commands::CheckConfig => {
            let config = BotConfig::load(&cli.config)?;
            print!("{}", describe_config(&config)?);
        }
        Commands::Symbols { search } => {
            // 설정 로드 실패 시 기본 목록
            let roster = match BotConfig::load(&cli.config) {
                Ok(config) => config.roster(),
                Err(e) => {
                    eprintln!("⚠️  설정을 불러오지 못해 기본 심볼 목록을 사용합니다: {e}");
                    SymbolRoster::default()
                }
            };
            print!("{}", render_symbols(&roster, search.as_deref()));
        }
    }

    Ok(())
}
