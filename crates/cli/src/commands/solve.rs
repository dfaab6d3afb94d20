//! `veristep solve` — One-shot or interactive question solving.

use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use veristep_agent::Solver;
use veristep_config::AppConfig;
use veristep_core::backend::Provider;
use veristep_core::report::{AgentReport, SolveStatus};

pub async fn run(
    question: Option<String>,
    retries: Option<u32>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    // Check for API key early — give a clear error
    if !config.has_api_key() {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set one of these environment variables:");
        eprintln!("    GEMINI_API_KEY=...      (for Gemini, the default provider)");
        eprintln!("    OPENAI_API_KEY=sk-...   (for OpenAI-compatible backends)");
        eprintln!("    VERISTEP_API_KEY=...    (generic)");
        eprintln!();
        eprintln!("  Or add it to your config file:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        return Err(Box::new(veristep_config::ConfigError::MissingApiKey));
    }

    let router = veristep_providers::router::build_from_config(&config);
    let provider = router.default().ok_or("No default provider configured")?;

    let solver = build_solver(provider, &config, retries);

    if let Some(q) = question {
        // One-shot mode
        let report = solve_one(&solver, &q).await?;
        print_report(&report, json);
    } else {
        // Interactive console
        println!();
        println!("  Veristep — Interactive Console");
        println!("  Provider: {}  Model: {}", config.default_provider, config.default_model);
        println!("  Type a question and press Enter. Type 'exit' to quit.");
        println!();

        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        print_prompt()?;
        while let Some(line) = lines.next_line().await? {
            let input = line.trim();
            if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
                break;
            }
            if input.is_empty() {
                print_prompt()?;
                continue;
            }

            match solve_one(&solver, input).await {
                Ok(report) => print_report(&report, json),
                Err(e) => eprintln!("  [Error] {e}"),
            }
            println!();
            print_prompt()?;
        }

        println!();
        println!("  Goodbye!");
    }

    Ok(())
}

fn build_solver(provider: Arc<dyn Provider>, config: &AppConfig, retries: Option<u32>) -> Solver {
    Solver::new(provider, &config.default_model)
        .with_temperature(config.default_temperature)
        .with_max_tokens(config.default_max_tokens)
        .with_max_retries(retries.unwrap_or(config.max_retries))
}

async fn solve_one(
    solver: &Solver,
    question: &str,
) -> Result<AgentReport, Box<dyn std::error::Error>> {
    eprint!("  Working...");
    let result = solver.solve(question).await;
    eprint!("\r            \r");
    Ok(result?)
}

fn print_report(report: &AgentReport, json: bool) {
    if json {
        match serde_json::to_string_pretty(report) {
            Ok(s) => println!("{s}"),
            Err(e) => eprintln!("  [Error] failed to serialize report: {e}"),
        }
        return;
    }

    let badge = match report.status {
        SolveStatus::Success => "✅ verified",
        SolveStatus::Failed => "⚠️  unverified",
    };

    println!();
    println!("  Answer:    {}", report.answer);
    println!("  Status:    {badge} (retries: {})", report.metadata.retries);
    println!("  Reasoning: {}", report.reasoning_visible_to_user);
    if !report.metadata.checks.is_empty() {
        println!("  Checks:");
        for check in &report.metadata.checks {
            let mark = if check.passed { "✔" } else { "✘" };
            println!("    {mark} {} — {}", check.check_name, check.details);
        }
    }
}

fn print_prompt() -> std::io::Result<()> {
    use std::io::Write;
    print!("  You > ");
    std::io::stdout().flush()
}
