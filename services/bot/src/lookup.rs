use crate::infra::PermitStatusView;
use clap::Args;
use permesso::config::AppConfig;
use permesso::error::AppError;
use permesso::telemetry;
use permesso::workflows::permit::{PermitCode, PermitStatusService, PortalClient, StatusVerdict};

#[derive(Args, Debug)]
pub(crate) struct CheckArgs {
    /// Permit code, e.g. 26BO123456, or six digits for the current year
    pub(crate) code: String,
    /// Print the result as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) async fn run_check(args: CheckArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let code = PermitCode::parse(&args.code)?;
    let service = PermitStatusService::new(PortalClient::new(&config.portal)?);
    let verdict = service.lookup(&code).await;

    if args.json {
        let view = PermitStatusView::new(&code, verdict);
        let rendered = serde_json::to_string_pretty(&view)
            .map_err(|err| AppError::Io(std::io::Error::other(err)))?;
        println!("{rendered}");
    } else {
        print!("{}", render_text(&code, verdict));
    }

    Ok(())
}

fn render_text(code: &PermitCode, verdict: StatusVerdict) -> String {
    let mut out = format!("Permit code: {}", code.raw());
    if code.raw() != code.normalized() {
        out.push_str(&format!(" (queried as {})", code.normalized()));
    }
    out.push('\n');
    out.push_str(&format!(
        "Status: {} {}\n\n{}\n",
        verdict.indicator(),
        verdict.title(),
        verdict.plain_description()
    ));
    out
}
