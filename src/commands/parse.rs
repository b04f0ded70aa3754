use crate::args::ParseArgs;
use crate::commands::{read_statement, Out, Rows};
use crate::error::{ErrorType, IntoResult};
use crate::model::KeywordTable;
use crate::{Config, Result};
use std::path::Path;
use tracing::debug;

/// Reads the statement at `args.file()` and renders its transactions.
///
/// Keywords come from `--keywords` if given, else from the configuration in `saoke_home` if it
/// has been initialized, else the built-in table is used.
pub async fn parse(saoke_home: &Path, args: &ParseArgs) -> Result<Out<Rows>> {
    let keywords = match args.keywords() {
        Some(path) => KeywordTable::load(path)
            .await
            .pub_result(ErrorType::Config)?,
        None if Config::exists(saoke_home) => Config::load(saoke_home)
            .await
            .pub_result(ErrorType::Config)?
            .keywords()
            .clone(),
        None => {
            debug!("No saoke home at {}, using default keywords", saoke_home.display());
            KeywordTable::default()
        }
    };

    let records = read_statement(args.file(), &keywords).await?;
    let rows = Rows::render(&records, args.format())?;
    Ok(Out::new(
        format!(
            "Found {} transactions in {}",
            records.len(),
            args.file().display()
        ),
        rows,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::OutputFormat;
    use crate::test::{StatementBuilder, TestEnv};
    use crate::utils;

    #[tokio::test]
    async fn test_parse_without_home() {
        let env = TestEnv::new().await;
        let file = env
            .write_file("june.xlsx", &StatementBuilder::statement().build())
            .await;
        let home = env.config().root().join("not-initialized");
        let args = ParseArgs::new(&file, OutputFormat::Json, None);

        let out = parse(&home, &args).await.unwrap();
        assert!(out.message().starts_with("Found 12 transactions"));
        match out.structure().unwrap() {
            Rows::Json(v) => {
                assert_eq!(v.as_array().unwrap().len(), 12);
                assert_eq!(v[0]["docNumber"], "FT23152001");
                assert_eq!(v[2]["date"], "2023-06-01T00:00:02Z");
            }
            other => panic!("expected json, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_parse_rejects_other_extensions() {
        let env = TestEnv::new().await;
        let file = env.write_file("june.csv", b"a,b,c").await;
        let args = ParseArgs::new(&file, OutputFormat::Table, None);
        let e = parse(env.config().root(), &args).await.unwrap_err();
        assert_eq!(crate::error_type(&e), Some(ErrorType::Parse));
    }

    #[tokio::test]
    async fn test_parse_reports_missing_header() {
        let env = TestEnv::new().await;
        let bytes = StatementBuilder::new().row(&["nothing", "here"]).build();
        let file = env.write_file("empty.xlsx", &bytes).await;
        let args = ParseArgs::new(&file, OutputFormat::Table, None);
        let e = parse(env.config().root(), &args).await.unwrap_err();
        assert_eq!(crate::error_type(&e), Some(ErrorType::Parse));
        assert!(format!("{e:#}").contains("Could not find transaction data header"));
    }

    #[tokio::test]
    async fn test_parse_with_keyword_file() {
        let env = TestEnv::new().await;
        let bytes = StatementBuilder::statement().build();
        let file = env.write_file("june.XLSX", &bytes).await;
        // With a footer marker that never matches, the rows after the totals row are read too.
        let keywords = env.config().root().join("keywords.json");
        utils::write(&keywords, r#"{ "footer": ["Nothing matches this"] }"#)
            .await
            .unwrap();
        let args = ParseArgs::new(&file, OutputFormat::Csv, Some(keywords));
        let out = parse(env.config().root(), &args).await.unwrap();
        assert!(out.message().starts_with("Found 14 transactions"));
    }
}
