use clap::Parser;
use color_eyre::eyre::{eyre, Result};
use marketing_dashboard::config::{DATA_PATH_VAR, DEBUG_VAR, LOG_FILE_VAR, PAGE_SIZE_VAR};
use marketing_dashboard::domain::{FiltersPatch, SortConfig, SortDirection, SortField, SpendRange};
use marketing_dashboard::store::Action;

#[derive(Debug, Parser)]
#[command(
    name = "marketing-dashboard",
    version,
    about = "Marketing performance dashboard"
)]
pub struct CliArgs {
    /// Print a report and exit
    #[arg(long)]
    pub headless: bool,

    /// Print the headless report as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Override the data document path
    #[arg(long, value_name = "PATH")]
    pub data: Option<String>,

    /// Initial rows per page
    #[arg(long = "page-size", value_name = "N")]
    pub page_size: Option<usize>,

    /// Write logs to this file
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<String>,

    /// Only include this channel (repeatable)
    #[arg(long = "channel", value_name = "NAME")]
    pub channels: Vec<String>,

    /// Only include this region (repeatable)
    #[arg(long = "region", value_name = "NAME")]
    pub regions: Vec<String>,

    /// Case-insensitive search over channel, region and id
    #[arg(long, value_name = "TEXT")]
    pub search: Option<String>,

    /// Minimum spend (inclusive)
    #[arg(long = "min-spend", value_name = "AMOUNT")]
    pub min_spend: Option<f64>,

    /// Maximum spend (inclusive)
    #[arg(long = "max-spend", value_name = "AMOUNT")]
    pub max_spend: Option<f64>,

    /// Sort field: id, channel, region, spend, impressions, clicks, conversions
    #[arg(long, value_name = "FIELD", value_parser = parse_sort_field)]
    pub sort: Option<SortField>,

    /// Sort descending
    #[arg(long)]
    pub desc: bool,

    /// Page to show
    #[arg(long, value_name = "N")]
    pub page: Option<usize>,
}

fn parse_sort_field(value: &str) -> std::result::Result<SortField, String> {
    SortField::parse(value).ok_or_else(|| format!("unknown sort field {value:?}"))
}

impl CliArgs {
    pub fn apply_env_overrides(&self) {
        if let Some(path) = &self.data {
            std::env::set_var(DATA_PATH_VAR, path);
        }
        if let Some(page_size) = self.page_size {
            std::env::set_var(PAGE_SIZE_VAR, page_size.to_string());
        }
        if let Some(path) = &self.log_file {
            std::env::set_var(LOG_FILE_VAR, path);
        }
        if self.debug {
            std::env::set_var(DEBUG_VAR, "1");
        }
    }

    /// Store actions that reproduce the requested view. Filters come first
    /// because they reset the page.
    pub fn view_actions(&self) -> Result<Vec<Action>> {
        let mut actions = Vec::new();

        if !self.channels.is_empty() {
            actions.push(Action::SetFilters(FiltersPatch::channels(
                self.channels.iter().cloned(),
            )));
        }
        if !self.regions.is_empty() {
            actions.push(Action::SetFilters(FiltersPatch::regions(
                self.regions.iter().cloned(),
            )));
        }
        if let Some(search) = &self.search {
            actions.push(Action::SetFilters(FiltersPatch::search(search.clone())));
        }
        if let Some(range) = self.spend_range()? {
            actions.push(Action::SetFilters(FiltersPatch::spend_range(Some(range))));
        }

        if let Some(field) = self.sort {
            let direction = if self.desc {
                SortDirection::Descending
            } else {
                SortDirection::Ascending
            };
            actions.push(Action::SetSorting(SortConfig::new(field, direction)));
        } else if self.desc {
            return Err(eyre!("--desc requires --sort"));
        }

        if let Some(page) = self.page {
            actions.push(Action::SetCurrentPage(page));
        }

        Ok(actions)
    }

    fn spend_range(&self) -> Result<Option<SpendRange>> {
        if self.min_spend.is_none() && self.max_spend.is_none() {
            return Ok(None);
        }
        if let Some(bound) = [self.min_spend, self.max_spend]
            .into_iter()
            .flatten()
            .find(|bound| !bound.is_finite())
        {
            return Err(eyre!("spend bounds must be finite numbers, got {bound}"));
        }
        let min = self.min_spend.unwrap_or(0.0);
        let max = self.max_spend.unwrap_or(f64::INFINITY);
        if min > max {
            return Err(eyre!("--min-spend {min} is greater than --max-spend {max}"));
        }
        Ok(Some(SpendRange::new(min, max)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(std::iter::once("marketing-dashboard").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn view_flags_become_actions_in_order() {
        let args = parse(&[
            "--channel", "Search", "--channel", "Email", "--region", "US", "--search", "q",
            "--min-spend", "10", "--sort", "spend", "--desc", "--page", "3",
        ]);
        let actions = args.view_actions().unwrap();

        assert_eq!(actions.len(), 6);
        assert_eq!(
            actions[0],
            Action::SetFilters(FiltersPatch::channels(["Search", "Email"]))
        );
        assert_eq!(
            actions[3],
            Action::SetFilters(FiltersPatch::spend_range(Some(SpendRange::new(
                10.0,
                f64::INFINITY
            ))))
        );
        assert_eq!(
            actions[4],
            Action::SetSorting(SortConfig::new(SortField::Spend, SortDirection::Descending))
        );
        assert_eq!(actions[5], Action::SetCurrentPage(3));
    }

    #[test]
    fn invalid_combinations_are_rejected() {
        assert!(CliArgs::try_parse_from(["marketing-dashboard", "--sort", "ctr"]).is_err());
        assert!(parse(&["--desc"]).view_actions().is_err());
        assert!(parse(&["--min-spend", "9", "--max-spend", "1"])
            .view_actions()
            .is_err());
        assert!(parse(&[]).view_actions().unwrap().is_empty());
    }

    #[test]
    fn non_finite_spend_bounds_are_rejected() {
        assert!(parse(&["--min-spend", "NaN"]).view_actions().is_err());
        assert!(parse(&["--max-spend", "NaN"]).view_actions().is_err());
        assert!(parse(&["--max-spend", "inf"]).view_actions().is_err());

        let actions = parse(&["--min-spend", "10"]).view_actions().unwrap();
        assert_eq!(
            actions,
            vec![Action::SetFilters(FiltersPatch::spend_range(Some(
                SpendRange::new(10.0, f64::INFINITY)
            )))]
        );
    }

    #[test]
    fn output_flags_parse() {
        let args = parse(&["--headless", "--json", "--data", "data.json", "--page-size", "25"]);
        assert!(args.headless && args.json);
        assert_eq!(args.data.as_deref(), Some("data.json"));
        assert_eq!(args.page_size, Some(25));
    }
}
