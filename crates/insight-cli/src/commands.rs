use std::fs;
use std::io::{self, Read};

use analysis_core::{CompanyArchetype, PromptContext, QuarterId, QuarterMetrics, QuarterRecord};
use anyhow::{Context, Result};
use fundamental_analysis::{latest, SystemAnalysisEngine};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::{InsightConfig, OutputFormat};

/// Single-quarter request as read from JSON
#[derive(Debug, Clone, Deserialize)]
pub struct AnalyzeRequest {
    pub company_type: String,
    pub current: QuarterMetrics,
    #[serde(default)]
    pub previous: Option<QuarterMetrics>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub quarter: Option<QuarterId>,
}

/// A company's quarter history as read from JSON
#[derive(Debug, Clone, Deserialize)]
pub struct SeriesRequest {
    pub company_type: String,
    #[serde(default)]
    pub company_name: Option<String>,
    pub quarters: Vec<QuarterRecord>,
}

#[derive(Debug, Serialize)]
struct ArchetypeEntry {
    tag: &'static str,
    name: &'static str,
}

/// Read a request body from `path`, where `-` means stdin.
pub fn read_input(path: &str) -> Result<String> {
    if path == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read request from stdin")?;
        return Ok(buf);
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read request file {path}"))
}

fn to_json<T: Serialize>(value: &T, config: &InsightConfig) -> Result<String> {
    let out = if config.pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(out)
}

pub fn analyze(
    engine: &SystemAnalysisEngine,
    body: &str,
    with_prompt_context: bool,
    config: &InsightConfig,
) -> Result<String> {
    let request: AnalyzeRequest = serde_json::from_str(body).context("Invalid analyze request")?;
    let result = engine.analyze_tag(&request.company_type, &request.current, request.previous.as_ref())?;

    let prompt_context = if with_prompt_context {
        let archetype: CompanyArchetype = request.company_type.parse()?;
        let company_name = request
            .company_name
            .clone()
            .context("--prompt-context requires company_name in the request")?;
        let quarter = request
            .quarter
            .context("--prompt-context requires quarter in the request")?;
        let record = QuarterRecord {
            quarter,
            metrics: request.current.clone(),
        };
        Some(PromptContext::new(company_name, archetype, &record, &result))
    } else {
        None
    };

    match (config.output, prompt_context) {
        (OutputFormat::Json, None) => to_json(&result, config),
        (OutputFormat::Json, Some(ctx)) => to_json(&json!({ "analysis": result, "prompt_context": ctx }), config),
        (OutputFormat::Summary, None) => Ok(result.summary),
        (OutputFormat::Summary, Some(ctx)) => Ok(format!("{}\n\n{}", result.summary, to_json(&ctx, config)?)),
    }
}

pub fn series(engine: &SystemAnalysisEngine, body: &str, config: &InsightConfig) -> Result<String> {
    let request: SeriesRequest = serde_json::from_str(body).context("Invalid series request")?;
    let archetype: CompanyArchetype = request.company_type.parse()?;
    let analyses = engine.analyze_series(archetype, &request.quarters);

    tracing::info!(
        company = request.company_name.as_deref().unwrap_or("-"),
        archetype = %archetype,
        quarters = analyses.len(),
        latest = ?latest(&analyses).map(|a| a.quarter.to_string()),
        "Series analyzed"
    );

    match config.output {
        OutputFormat::Json => to_json(
            &json!({
                "company_name": request.company_name,
                "company_type": archetype,
                "quarters": analyses,
            }),
            config,
        ),
        OutputFormat::Summary => {
            let mut blocks = Vec::with_capacity(analyses.len() + 1);
            if let Some(name) = &request.company_name {
                blocks.push(format!("{name} ({})", archetype.display_name()));
            }
            for analysis in &analyses {
                let header = match analysis.previous_quarter {
                    Some(prev) => format!("== {} (vs {prev}) ==", analysis.quarter),
                    None => format!("== {} ==", analysis.quarter),
                };
                blocks.push(format!("{header}\n{}", analysis.result.summary));
            }
            Ok(blocks.join("\n\n"))
        }
    }
}

pub fn archetypes(config: &InsightConfig) -> Result<String> {
    match config.output {
        OutputFormat::Json => {
            let entries: Vec<ArchetypeEntry> = CompanyArchetype::ALL
                .iter()
                .map(|a| ArchetypeEntry {
                    tag: a.as_tag(),
                    name: a.display_name(),
                })
                .collect();
            to_json(&entries, config)
        }
        OutputFormat::Summary => Ok(CompanyArchetype::ALL
            .iter()
            .map(|a| format!("{:<18} {}", a.as_tag(), a.display_name()))
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use analysis_core::AnalysisError;
    use serde_json::Value;

    fn json_config() -> InsightConfig {
        InsightConfig {
            pretty: false,
            ..InsightConfig::default()
        }
    }

    fn summary_config() -> InsightConfig {
        InsightConfig {
            output: OutputFormat::Summary,
            ..InsightConfig::default()
        }
    }

    fn platform_request() -> Value {
        json!({
            "company_type": "TECH_PLATFORM",
            "company_name": "Example Platforms",
            "quarter": "2024-Q2",
            "current": {
                "pe": 40.0, "ps": 10.0, "pb": 8.0, "roic": 18.0, "wacc": 9.0,
                "gross_margin": 70.0, "fcf_margin": 30.0, "capex_ratio": 15.0
            }
        })
    }

    #[test]
    fn test_analyze_json() {
        let engine = SystemAnalysisEngine::new();
        let out = analyze(&engine, &platform_request().to_string(), false, &json_config()).unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["quality_score"], 100.0);
        assert_eq!(value["valuation_score"], 75.5);
        assert_eq!(value["trend_score"], 50.0);
        assert_eq!(value["labels"], json!(["high-quality, fair valuation"]));
    }

    #[test]
    fn test_analyze_summary() {
        let engine = SystemAnalysisEngine::new();
        let out = analyze(&engine, &platform_request().to_string(), false, &summary_config()).unwrap();
        assert!(out.starts_with("Quality score: 100.00/100\n"));
        assert!(out.ends_with("Labels: high-quality, fair valuation"));
    }

    #[test]
    fn test_analyze_with_prompt_context() {
        let engine = SystemAnalysisEngine::new();
        let out = analyze(&engine, &platform_request().to_string(), true, &json_config()).unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        let ctx = &value["prompt_context"];
        assert_eq!(ctx["company_name"], "Example Platforms");
        assert_eq!(ctx["company_type"], "TECH_PLATFORM");
        assert_eq!(ctx["quarter"], "2024-Q2");
        assert_eq!(ctx["metrics"]["roic"], 18.0);
        assert_eq!(ctx["labels"], json!(["high-quality, fair valuation"]));
        assert_eq!(value["analysis"]["valuation_score"], 75.5);
    }

    #[test]
    fn test_prompt_context_requires_name_and_quarter() {
        let engine = SystemAnalysisEngine::new();
        let mut request = platform_request();
        request.as_object_mut().unwrap().remove("quarter");
        let err = analyze(&engine, &request.to_string(), true, &json_config()).unwrap_err();
        assert!(err.to_string().contains("quarter"));
    }

    #[test]
    fn test_analyze_unknown_type() {
        let engine = SystemAnalysisEngine::new();
        let mut request = platform_request();
        request["company_type"] = json!("CRYPTO");
        let err = analyze(&engine, &request.to_string(), false, &json_config()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<AnalysisError>(),
            Some(&AnalysisError::UnsupportedArchetype("CRYPTO".to_string()))
        );
    }

    #[test]
    fn test_analyze_malformed_body() {
        let engine = SystemAnalysisEngine::new();
        let err = analyze(&engine, "{not json", false, &json_config()).unwrap_err();
        assert!(err.to_string().contains("Invalid analyze request"));
    }

    #[test]
    fn test_series_json() {
        let engine = SystemAnalysisEngine::new();
        let body = json!({
            "company_type": "FINANCIAL",
            "company_name": "Example Bank",
            "quarters": [
                { "quarter": "2024-Q2", "roe": 16.0, "pb": 0.95 },
                { "quarter": "2023-Q4", "roe": 15.8, "pb": 1.1 }
            ]
        });
        let out = series(&engine, &body.to_string(), &json_config()).unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        let quarters = value["quarters"].as_array().unwrap();
        assert_eq!(quarters.len(), 2);
        assert_eq!(quarters[0]["quarter"], "2023-Q4");
        assert_eq!(quarters[1]["previous_quarter"], "2023-Q4");
        assert_eq!(quarters[1]["labels"], json!(["high-ROE financial", "deeply undervalued"]));
        assert_eq!(value["company_type"], "FINANCIAL");
    }

    #[test]
    fn test_series_summary() {
        let engine = SystemAnalysisEngine::new();
        let body = json!({
            "company_type": "MANUFACTURING",
            "company_name": "Example Works",
            "quarters": [
                { "quarter": "2024-Q1", "roic": 0.09 },
                { "quarter": "2024-Q2", "roic": 0.10 }
            ]
        });
        let out = series(&engine, &body.to_string(), &summary_config()).unwrap();
        assert!(out.starts_with("Example Works (Manufacturing)\n\n== 2024-Q1 ==\n"));
        assert!(out.contains("== 2024-Q2 (vs 2024-Q1) ==\nQuality score:"));
    }

    #[test]
    fn test_series_rejects_bad_quarter() {
        let engine = SystemAnalysisEngine::new();
        let body = json!({
            "company_type": "MANUFACTURING",
            "quarters": [{ "quarter": "2024-Q7" }]
        });
        assert!(series(&engine, &body.to_string(), &json_config()).is_err());
    }

    #[test]
    fn test_archetypes_listing() {
        let out = archetypes(&json_config()).unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 6);
        assert_eq!(value[0]["tag"], "TECH_PLATFORM");
        assert_eq!(value[0]["name"], "Tech platform");

        let text = archetypes(&summary_config()).unwrap();
        assert_eq!(text.lines().count(), 6);
        assert!(text.lines().any(|l| l.starts_with("PHARMA_INNOVATION") && l.ends_with("Innovative pharma")));
    }

    #[test]
    fn test_read_input_missing_file() {
        let err = read_input("/nonexistent/request.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/request.json"));
    }
}
