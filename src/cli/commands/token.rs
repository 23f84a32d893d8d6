use clap::Args;
use serde_json::json;

use crate::auth::{generate_jwt, Claims, Role};
use crate::cli::OutputFormat;
use crate::config::config;

#[derive(Args, Debug)]
pub struct TokenArgs {
    #[arg(long, help = "User id placed in the `sub` claim")]
    pub subject: i64,

    #[arg(long, help = "admin, household or collector")]
    pub role: Role,

    #[arg(long, help = "Lifetime in hours (defaults to SECURITY_JWT_EXPIRY_HOURS)")]
    pub hours: Option<u64>,
}

pub fn handle(args: TokenArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let security = &config().security;
    let hours = args.hours.unwrap_or(security.jwt_expiry_hours);
    let claims = Claims::new(args.subject, args.role, hours)?;
    let token = generate_jwt(&claims, &security.jwt_secret)?;

    match output_format {
        OutputFormat::Text => println!("{}", token),
        OutputFormat::Json => output_format.success(
            "Token issued",
            json!({
                "token": token,
                "subject": args.subject,
                "role": args.role,
                "expires_at": claims.exp,
            }),
        )?,
    }
    Ok(())
}
