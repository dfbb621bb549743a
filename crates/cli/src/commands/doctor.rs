use crumb_backend::{HttpBackend, StorefrontBackend};
use crumb_core::config::{AppConfig, LoadOptions};
use serde::Serialize;

use crate::commands::CommandResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum CheckStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: CheckStatus,
    details: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    overall_status: CheckStatus,
    summary: String,
    checks: Vec<DoctorCheck>,
}

pub async fn run(json_output: bool) -> CommandResult {
    let report = build_report().await;
    let exit_code = if report.overall_status == CheckStatus::Pass { 0 } else { 1 };

    let output = if json_output {
        serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!(
                "{{\"overall_status\":\"fail\",\"summary\":\"doctor serialization failed: {}\"}}",
                error.to_string().replace('"', "'")
            )
        })
    } else {
        render_human(&report)
    };

    CommandResult { exit_code, output }
}

async fn build_report() -> DoctorReport {
    let mut checks = Vec::new();

    match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Pass,
                details: "configuration loaded and validated".to_string(),
            });
            checks.push(check_generative_readiness(&config));
            checks.push(check_backend_reachability(&config).await);
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config_validation",
                status: CheckStatus::Fail,
                details: error.to_string(),
            });
            checks.push(DoctorCheck {
                name: "generative_readiness",
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            });
            checks.push(DoctorCheck {
                name: "backend_reachability",
                status: CheckStatus::Skipped,
                details: "skipped because configuration did not load".to_string(),
            });
        }
    }

    let all_usable = checks.iter().all(|check| check.status != CheckStatus::Fail);
    let overall_status = if all_usable { CheckStatus::Pass } else { CheckStatus::Fail };
    let summary = if all_usable {
        "doctor: all readiness checks passed".to_string()
    } else {
        "doctor: one or more readiness checks failed".to_string()
    };

    DoctorReport { overall_status, summary, checks }
}

fn check_generative_readiness(config: &AppConfig) -> DoctorCheck {
    // A missing key is a supported degraded mode, so it is not a failure.
    match &config.llm.api_key {
        Some(_) => DoctorCheck {
            name: "generative_readiness",
            status: CheckStatus::Pass,
            details: format!("api key present, model `{}`", config.llm.model),
        },
        None => DoctorCheck {
            name: "generative_readiness",
            status: CheckStatus::Skipped,
            details: "no api key configured; assistant will answer deterministically only"
                .to_string(),
        },
    }
}

async fn check_backend_reachability(config: &AppConfig) -> DoctorCheck {
    let backend = HttpBackend::new(&config.backend);
    match backend.products().await {
        Ok(products) => DoctorCheck {
            name: "backend_reachability",
            status: CheckStatus::Pass,
            details: format!("GET /products returned {} product(s)", products.len()),
        },
        Err(error) => DoctorCheck {
            name: "backend_reachability",
            status: CheckStatus::Fail,
            details: error.to_string(),
        },
    }
}

fn render_human(report: &DoctorReport) -> String {
    let mut lines = vec![report.summary.clone()];
    for check in &report.checks {
        lines.push(format!("  [{:?}] {} - {}", check.status, check.name, check.details));
    }
    lines.join("\n")
}
