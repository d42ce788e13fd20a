use colored::Colorize;
use coolflow_client::{ClientConfig, CoolifyClient};
use coolflow_config::DotEnvFile;
use coolflow_config::settings::{ENV_TOKEN, ENV_URL};

pub async fn handle(url: Option<String>, token: Option<String>, force: bool) -> anyhow::Result<()> {
    coolflow_config::load_dotenv()?;

    let url = url
        .or_else(|| std::env::var(ENV_URL).ok())
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| anyhow::anyhow!("Coolify URL is required: pass --url or set {}", ENV_URL))?;
    let token = token
        .or_else(|| std::env::var(ENV_TOKEN).ok())
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| {
            anyhow::anyhow!("API token is required: pass --token or set {}", ENV_TOKEN)
        })?;

    println!("{}", "Checking Coolify API...".blue());
    let client = CoolifyClient::new(ClientConfig::new(&url, &token))?;
    match client.version().await {
        Ok(version) => println!(
            "  ✓ Connected to Coolify {} at {}",
            version.cyan(),
            client.instance_url()
        ),
        Err(e) if force => println!("  ⚠ API check failed, continuing: {}", e),
        Err(e) => return Err(e.into()),
    }

    let mut env_file = DotEnvFile::open(".env")?;
    let (written, skipped) =
        env_file.set_missing(&[(ENV_URL, url.as_str()), (ENV_TOKEN, token.as_str())])?;

    println!();
    for key in &written {
        println!("  ✓ {} written to {}", key.cyan(), env_file.path().display());
    }
    for key in &skipped {
        println!("  ℹ {} already set, kept as is", key.cyan());
    }

    println!();
    println!("{}", "Next steps:".bold());
    println!("  {} status", "cool".cyan());
    println!("  {} provision --help", "cool".cyan());
    Ok(())
}
