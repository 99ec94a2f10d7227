use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use pagekit::config::Config;
use pagekit::http::{CursorQuery, OffsetQuery};
use pagekit::{cursor, offset};

use super::{load_config, load_store};

#[derive(Debug, Args)]
pub struct CursorArgs {
    /// JSON array of documents to load
    #[arg(long, value_name = "FILE")]
    pub seed: PathBuf,

    /// Cursor from a previous page's `next`
    #[arg(long)]
    pub cursor: Option<String>,

    /// Page size (defaults to pagination.default_page_size)
    #[arg(long)]
    pub limit: Option<u64>,

    /// Comma-separated `field:value` equality filter
    #[arg(long)]
    pub filter: Option<String>,
}

#[derive(Debug, Args)]
pub struct OffsetArgs {
    /// JSON array of documents to load
    #[arg(long, value_name = "FILE")]
    pub seed: PathBuf,

    /// 1-based page number
    #[arg(long, default_value_t = 1)]
    pub page: u64,

    /// Page size (defaults to pagination.default_page_size)
    #[arg(long)]
    pub per_page: Option<u64>,

    /// Field to sort by
    #[arg(long)]
    pub sort_field: Option<String>,

    /// 1 for ascending, anything else descending
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    pub sort_direction: i64,

    /// Comma-separated `field:value` equality filter
    #[arg(long)]
    pub filter: Option<String>,
}

pub async fn cursor(config_path: Option<PathBuf>, args: CursorArgs) -> Result<()> {
    let config = load_config(config_path.as_deref())?;
    println!("{}", render_cursor(&config, &args).await?);
    Ok(())
}

pub async fn offset(config_path: Option<PathBuf>, args: OffsetArgs) -> Result<()> {
    let config = load_config(config_path.as_deref())?;
    println!("{}", render_offset(&config, &args).await?);
    Ok(())
}

async fn render_cursor(config: &Config, args: &CursorArgs) -> Result<String> {
    let store = load_store(&args.seed).await?;
    let query = CursorQuery {
        cursor: args.cursor.clone(),
        limit: args.limit,
        filter: args.filter.clone(),
    };

    let page = cursor::paginate(
        &store,
        &query.filter()?,
        &query.to_request(&config.pagination),
    )
    .await?;
    Ok(serde_json::to_string_pretty(&page)?)
}

async fn render_offset(config: &Config, args: &OffsetArgs) -> Result<String> {
    let store = load_store(&args.seed).await?;
    let query = OffsetQuery {
        page: Some(args.page),
        per_page: args.per_page,
        sort_field: args.sort_field.clone(),
        sort_direction: Some(args.sort_direction),
        filter: args.filter.clone(),
    };

    let page = offset::paginate(
        &store,
        &query.filter()?,
        &query.to_options(&config.pagination),
    )
    .await?;
    Ok(serde_json::to_string_pretty(&page)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use std::io::Write;
    use std::path::Path;

    fn people_seed() -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        let people = json!([
            { "name": "Alice", "age": 30, "team": "red" },
            { "name": "Bob", "age": 25, "team": "blue" },
            { "name": "Carol", "age": 35, "team": "red" },
            { "name": "Dave", "age": 28, "team": "blue" },
        ]);
        write!(file, "{people}").unwrap();
        file
    }

    fn offset_args(seed: &Path) -> OffsetArgs {
        OffsetArgs {
            seed: seed.to_path_buf(),
            page: 1,
            per_page: None,
            sort_field: None,
            sort_direction: 1,
            filter: None,
        }
    }

    #[tokio::test]
    async fn test_render_offset_sorted() {
        let seed = people_seed();
        let args = OffsetArgs {
            per_page: Some(2),
            sort_field: Some("age".to_string()),
            ..offset_args(seed.path())
        };

        let output = render_offset(&Config::default(), &args).await.unwrap();
        let page: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(page["results"][0]["name"], "Bob");
        assert_eq!(page["results"][1]["name"], "Dave");
        assert_eq!(page["totalPages"], 2);
        assert_eq!(page["pagination"]["next"], json!({ "page": 2, "size": 2 }));
    }

    #[tokio::test]
    async fn test_render_offset_uses_configured_default_size() {
        let seed = people_seed();
        let mut config = Config::default();
        config.pagination.default_page_size = 3;

        let output = render_offset(&config, &offset_args(seed.path()))
            .await
            .unwrap();
        let page: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(page["perPage"], 3);
        assert_eq!(page["results"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_render_cursor_with_filter() {
        let seed = people_seed();
        let args = CursorArgs {
            seed: seed.path().to_path_buf(),
            cursor: None,
            limit: Some(1),
            filter: Some("team:blue".to_string()),
        };

        let output = render_cursor(&Config::default(), &args).await.unwrap();
        let page: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(page["results"][0]["name"], "Dave");
        assert_eq!(page["hasNext"], true);
        assert_eq!(page["pagination"]["next"], page["results"][0]["_id"]);
    }

    #[tokio::test]
    async fn test_render_cursor_rejects_bad_cursor() {
        let seed = people_seed();
        let args = CursorArgs {
            seed: seed.path().to_path_buf(),
            cursor: Some("bogus".to_string()),
            limit: None,
            filter: None,
        };

        let err = render_cursor(&Config::default(), &args).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<pagekit::Error>(),
            Some(pagekit::Error::InvalidCursor { .. })
        ));
    }
}
