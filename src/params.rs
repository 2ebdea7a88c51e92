use tracing::warn;

use crate::cli::Cli;
use crate::filter::{MonthlyFilter, OverallFilter, PeriodFilters, RollingFilter, WeeklyFilter};

/// Map command-line selectors onto one filter value per period.
///
/// Employee and team apply to every period; `--date-from`/`--date-to` feed both
/// the overall and the 90-day filters.
pub fn build_period_filters(cli: &Cli) -> PeriodFilters {
  if cli.date_from.is_some() != cli.date_to.is_some() {
    warn!("90-day override needs both --date-from and --date-to; using the rolling window");
  }

  PeriodFilters {
    weekly: WeeklyFilter { employee: cli.employee.clone(), team: cli.team.clone(), week: cli.week },
    monthly: MonthlyFilter {
      employee: cli.employee.clone(),
      team: cli.team.clone(),
      month: cli.month,
      year: cli.year,
    },
    overall: OverallFilter {
      employee: cli.employee.clone(),
      team: cli.team.clone(),
      year: cli.overall_year,
      month: cli.overall_month,
      date_from: cli.date_from,
      date_to: cli.date_to,
    },
    rolling90: RollingFilter {
      employee: cli.employee.clone(),
      team: cli.team.clone(),
      date_from: cli.date_from,
      date_to: cli.date_to,
    },
  }
}
