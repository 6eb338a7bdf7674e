//! Folio Shield CLI binary.
//!
//! Portfolio security-event pipeline.
//!
//! # Commands
//!
//! - `serve` - Start the HTTP server (detection, reporting API, chat)
//! - `classify` - Classify a User-Agent string
//! - `chat` - Ask the portfolio assistant a question
//! - `events` - List recent events from a running server
//! - `metrics` - Show counters from a running server
//! - `clear` - Clear a running server's events and counters
//! - `inject` - Record a test event on a running server
//! - `dashboard` - Live security dashboard in the terminal

use std::future::Future;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use shield::{
    chat::ChatService,
    config::Config,
    dashboard::{render_text, DashboardPoller, ReportingClient},
    events::{EventType, NewSecurityEvent, Severity},
    security::{first_match, HeuristicClassifier},
    server::ShieldServer,
    VERSION,
};

#[derive(Parser)]
#[command(name = "shield")]
#[command(version = VERSION)]
#[command(about = "Folio Shield - portfolio security-event pipeline", long_about = None)]
struct Cli {
    /// Config file (default: <config dir>/folio-shield/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Bind to all interfaces (0.0.0.0)
        #[arg(long)]
        bind_all: bool,

        /// Events retained in memory
        #[arg(long)]
        capacity: Option<usize>,

        /// Disable User-Agent detection
        #[arg(long)]
        no_detection: bool,

        /// Disable CORS
        #[arg(long)]
        no_cors: bool,

        /// Inference API key (or GROQ_API_KEY env var)
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Classify a User-Agent string
    Classify {
        /// User-Agent header value
        user_agent: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Ask the portfolio assistant a question
    Chat {
        /// Message
        message: String,

        /// Ask a running server instead of answering locally
        #[arg(long)]
        url: Option<String>,
    },

    /// List recent events from a running server
    Events {
        /// Server URL
        #[arg(long)]
        url: Option<String>,

        /// Maximum events
        #[arg(short, long, default_value = "20")]
        limit: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show counters from a running server
    Metrics {
        /// Server URL
        #[arg(long)]
        url: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Clear a running server's events and counters
    Clear {
        /// Server URL
        #[arg(long)]
        url: Option<String>,
    },

    /// Record a test event on a running server
    Inject {
        /// Event type (SQL_INJECTION, BRUTE_FORCE, XSS_ATTEMPT, RATE_LIMIT, BOT_DETECTED, BLOCKED)
        #[arg(short = 't', long = "type")]
        event_type: String,

        /// Severity (default: the type's usual severity)
        #[arg(short, long)]
        severity: Option<String>,

        /// Source address
        #[arg(long, default_value = "127.0.0.1")]
        ip: String,

        /// Request path
        #[arg(long, default_value = "/")]
        path: String,

        /// Reason
        #[arg(long, default_value = "injected test event")]
        reason: String,

        /// Server URL
        #[arg(long)]
        url: Option<String>,
    },

    /// Live security dashboard
    Dashboard {
        /// Server URL
        #[arg(long)]
        url: Option<String>,

        /// Seconds between refreshes
        #[arg(short, long)]
        interval: Option<u64>,

        /// Events per refresh
        #[arg(short, long)]
        limit: Option<usize>,

        /// Render once and exit
        #[arg(long)]
        once: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.json_logs);

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve {
            port,
            host,
            bind_all,
            capacity,
            no_detection,
            no_cors,
            api_key,
        } => cmd_serve(
            config,
            ServeOverrides {
                port,
                host,
                bind_all,
                capacity,
                no_detection,
                no_cors,
                api_key,
            },
        ),

        Commands::Classify { user_agent, json } => cmd_classify(&user_agent, json),

        Commands::Chat { message, url } => cmd_chat(&config, &message, url),

        Commands::Events { url, limit, json } => {
            let client = reporting_client(&config, url)?;
            block_on(async {
                let events = client.events(limit).await?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&events)?);
                } else if events.is_empty() {
                    println!("No events recorded");
                } else {
                    for event in &events {
                        println!(
                            "{}  {:<8} {:<13} {:<15} {:<20} {}",
                            event.timestamp.format("%Y-%m-%d %H:%M:%S"),
                            event.severity.as_str(),
                            event.event_type.as_str(),
                            event.ip,
                            event.path,
                            event.reason
                        );
                    }
                }
                Ok(())
            })
        },

        Commands::Metrics { url, json } => {
            let client = reporting_client(&config, url)?;
            block_on(async {
                let metrics = client.metrics().await?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&metrics)?);
                } else {
                    println!("Total requests:    {}", metrics.total_requests);
                    println!("Blocked requests:  {}", metrics.blocked_requests);
                    println!("Block rate:        {:.0}%", metrics.block_rate());
                    println!();
                    for event_type in EventType::ALL {
                        if let Some(count) = metrics.count_for(event_type) {
                            println!("  {:<16} {}", event_type.label(), count);
                        }
                    }
                }
                Ok(())
            })
        },

        Commands::Clear { url } => {
            let client = reporting_client(&config, url)?;
            block_on(async {
                client.clear().await?;
                println!("Cleared events and metrics on {}", client.base_url());
                Ok(())
            })
        },

        Commands::Inject {
            event_type,
            severity,
            ip,
            path,
            reason,
            url,
        } => {
            let event_type: EventType = event_type.parse()?;
            let mut event = NewSecurityEvent::new(event_type, ip, path, reason);
            if let Some(severity) = severity {
                event = event.with_severity(severity.parse::<Severity>()?);
            }

            let client = reporting_client(&config, url)?;
            block_on(async {
                let stored = client.inject(&event).await?;
                println!(
                    "Recorded {} ({} {}) as {}",
                    stored.event_type, stored.severity, stored.path, stored.id
                );
                Ok(())
            })
        },

        Commands::Dashboard {
            url,
            interval,
            limit,
            once,
        } => cmd_dashboard(config, url, interval, limit, once),
    }
}

fn init_tracing(verbose: bool, json: bool) {
    let log_level = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn block_on<F>(future: F) -> anyhow::Result<()>
where
    F: Future<Output = anyhow::Result<()>>,
{
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(future)
}

fn reporting_client(config: &Config, url: Option<String>) -> anyhow::Result<ReportingClient> {
    let url = url.unwrap_or_else(|| config.dashboard.url.clone());
    Ok(ReportingClient::new(url, config.dashboard.timeout())?)
}

struct ServeOverrides {
    port: Option<u16>,
    host: Option<String>,
    bind_all: bool,
    capacity: Option<usize>,
    no_detection: bool,
    no_cors: bool,
    api_key: Option<String>,
}

fn cmd_serve(mut config: Config, overrides: ServeOverrides) -> anyhow::Result<()> {
    // CLI flags take precedence over file and environment
    if let Some(port) = overrides.port {
        config.server.port = port;
    }
    if let Some(host) = overrides.host {
        config.server.host = host;
    }
    if overrides.bind_all {
        config.server.host = "0.0.0.0".to_string();
    }
    if let Some(capacity) = overrides.capacity {
        config.store.capacity = capacity;
    }
    if overrides.no_detection {
        config.server.detection = false;
    }
    if overrides.no_cors {
        config.server.cors = false;
    }
    if let Some(key) = overrides.api_key {
        config.chat.api_key = Some(key);
    }

    let server_config = config.server_config()?;

    block_on(async move {
        let server = ShieldServer::new(server_config);

        let signal = server.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Shutdown requested");
                signal.shutdown();
            }
        });

        server.run().await?;
        Ok(())
    })
}

fn cmd_classify(user_agent: &str, json_output: bool) -> anyhow::Result<()> {
    let classifier = HeuristicClassifier::new();
    let event_type = classifier.classify(Some(user_agent));
    let rule = first_match(&user_agent.to_lowercase());

    if json_output {
        let output = serde_json::json!({
            "userAgent": user_agent,
            "type": event_type,
            "severity": event_type.map(|t| t.default_severity()),
            "rule": rule.map(|r| r.name),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        match (event_type, rule) {
            (Some(event_type), Some(rule)) => println!(
                "{} ({}) - rule '{}': {}",
                event_type,
                event_type.default_severity(),
                rule.name,
                rule.description
            ),
            _ => println!("No match"),
        }
    }

    Ok(())
}

fn cmd_chat(config: &Config, message: &str, url: Option<String>) -> anyhow::Result<()> {
    let chat = ChatService::from_config(config.chat.upstream_config());

    block_on(async move {
        let response = match url {
            Some(url) => {
                let endpoint = format!("{}/api/chat", url.trim_end_matches('/'));
                let response = reqwest::Client::builder()
                    .timeout(config.dashboard.timeout())
                    .build()?
                    .post(endpoint)
                    .json(&serde_json::json!({ "message": message }))
                    .send()
                    .await?
                    .error_for_status()?;
                let body: serde_json::Value = response.json().await?;
                body["response"].as_str().unwrap_or_default().to_string()
            },
            None => chat.respond(message).await.response,
        };

        println!("{response}");
        Ok(())
    })
}

fn cmd_dashboard(
    config: Config,
    url: Option<String>,
    interval: Option<u64>,
    limit: Option<usize>,
    once: bool,
) -> anyhow::Result<()> {
    let mut poller_config = config.dashboard.poller_config();
    if let Some(secs) = interval {
        poller_config.interval = std::time::Duration::from_secs(secs.max(1));
    }
    if let Some(limit) = limit {
        poller_config.event_limit = limit;
    }

    let client = reporting_client(&config, url)?;
    let poller = std::sync::Arc::new(DashboardPoller::new(client, poller_config));

    block_on(async move {
        if once {
            let summary = poller.refresh().await?;
            print!("{}", render_text(&summary));
            return Ok(());
        }

        let mut updates = poller.subscribe();
        let handle = poller.clone().spawn();

        loop {
            tokio::select! {
                changed = updates.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let latest = updates.borrow_and_update().clone();
                    if let Some(summary) = latest {
                        // clear screen, cursor home
                        print!("\x1B[2J\x1B[H{}", render_text(&summary));
                    }
                }
                _ = tokio::signal::ctrl_c() => break,
            }
        }

        handle.stop().await;
        Ok(())
    })
}
