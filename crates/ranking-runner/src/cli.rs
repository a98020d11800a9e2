/// Command-line switches; environment configuration lives in `RunnerConfig`.
#[derive(Debug, Clone, PartialEq)]
pub struct CliArgs {
    pub technical: bool,
    pub fundamental: bool,
    pub sectors: bool,
    pub dry_run: bool,
    pub json: bool,
    pub db: Option<String>,
    pub batch_size: Option<usize>,
    pub top_n: usize,
}

pub const DEFAULT_TOP_N: usize = 10;

impl CliArgs {
    /// Parse `args` (program name first). No pipeline flag means all of them.
    pub fn parse(args: &[String]) -> Self {
        let has = |flag: &str| args.iter().any(|a| a == flag);
        let value_of = |flag: &str| {
            args.iter()
                .position(|a| a == flag)
                .and_then(|i| args.get(i + 1))
        };

        let all = has("--all");
        let mut technical = all || has("--technical");
        let mut fundamental = all || has("--fundamental");
        let mut sectors = all || has("--sectors");
        if !(technical || fundamental || sectors) {
            technical = true;
            fundamental = true;
            sectors = true;
        }

        Self {
            technical,
            fundamental,
            sectors,
            dry_run: has("--dry-run"),
            json: has("--json"),
            db: value_of("--db").cloned(),
            batch_size: value_of("--batch-size").and_then(|v| v.parse().ok()),
            top_n: value_of("--top")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TOP_N),
        }
    }

    pub fn wants_help(args: &[String]) -> bool {
        args.iter().any(|a| a == "--help" || a == "-h")
    }

    pub fn print_usage() {
        eprintln!("Usage:");
        eprintln!("  ranking-runner [--technical] [--fundamental] [--sectors] [--all]");
        eprintln!();
        eprintln!("Options:");
        eprintln!("  --dry-run          Score and report without writing to the DB");
        eprintln!("  --db PATH          SQLite DB path (default: DATABASE_URL or rankings.db)");
        eprintln!("  --batch-size N     Rows per upsert batch (default: UPSERT_BATCH_SIZE or 500)");
        eprintln!("  --top N            Rows in the top/bottom tables (default: {})", DEFAULT_TOP_N);
        eprintln!("  --json             Print the run report as JSON");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("ranking-runner")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_no_pipeline_flag_runs_everything() {
        let cli = CliArgs::parse(&args(&["--dry-run"]));
        assert!(cli.technical && cli.fundamental && cli.sectors);
        assert!(cli.dry_run);
        assert_eq!(cli.top_n, DEFAULT_TOP_N);
    }

    #[test]
    fn test_single_pipeline_and_values() {
        let cli = CliArgs::parse(&args(&["--fundamental", "--db", "sqlite:test.db", "--batch-size", "50", "--top", "5"]));
        assert!(cli.fundamental);
        assert!(!cli.technical && !cli.sectors);
        assert_eq!(cli.db.as_deref(), Some("sqlite:test.db"));
        assert_eq!(cli.batch_size, Some(50));
        assert_eq!(cli.top_n, 5);
    }

    #[test]
    fn test_bad_number_falls_back() {
        let cli = CliArgs::parse(&args(&["--technical", "--batch-size", "many"]));
        assert_eq!(cli.batch_size, None);
    }
}
