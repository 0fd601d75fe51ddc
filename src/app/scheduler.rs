//! Daily category sweep scheduling.
//!
//! At the configured wall-clock time, every configured category gets one
//! full discovery run and channel publish with its own discount floor.
//! Categories run sequentially with a pause between them; a failed
//! category logs and the sweep continues. Reentrancy across ticks needs
//! no guard here: each sweep builds its own pipelines and shares nothing.

use chrono::{Local, NaiveDateTime, NaiveTime, TimeDelta};
use tokio::time::sleep;
use tracing::{info, warn};

use crate::config::{CategoryConfig, Config};
use crate::port::{Fetcher, Publisher};

use super::publisher::ChannelPublisher;
use super::run_discovery;

/// Runs category sweeps against a fetcher and an optional channel.
pub struct SweepRunner<'a> {
    config: &'a Config,
    fetcher: &'a dyn Fetcher,
    publisher: Option<&'a dyn Publisher>,
}

impl<'a> SweepRunner<'a> {
    #[must_use]
    pub fn new(
        config: &'a Config,
        fetcher: &'a dyn Fetcher,
        publisher: Option<&'a dyn Publisher>,
    ) -> Self {
        Self {
            config,
            fetcher,
            publisher,
        }
    }

    /// Sweep one category: discovery with the category as search term and
    /// its discount floor, then channel publish of the top deals.
    pub async fn run_category(&self, category: &CategoryConfig) {
        info!(
            category = %category.name,
            min_discount = category.min_discount,
            "scheduled sweep starting"
        );

        let mut criteria = self.config.default_criteria();
        criteria.search_term = category.name.clone();
        criteria.min_discount_percent = category.min_discount;
        // Category sweeps range over the whole catalog, not the default
        // budget band of the interactive search.
        criteria.min_budget = 0.0;
        criteria.max_budget = f64::INFINITY;

        let outcome = run_discovery(self.fetcher, &self.config.scraper, &criteria).await;

        if outcome.deals.is_empty() {
            info!(category = %category.name, scraped = outcome.scraped, "sweep found no deals");
            return;
        }

        let top = &outcome.deals[..outcome.deals.len().min(self.config.telegram.top_deals)];

        match self.publisher {
            Some(publisher) => {
                let summary = ChannelPublisher::new(publisher)
                    .publish_deals(top, &category.name)
                    .await;
                info!(
                    category = %category.name,
                    sent = summary.sent,
                    failed = summary.failed,
                    "sweep published"
                );
            }
            None => {
                info!(
                    category = %category.name,
                    deals = top.len(),
                    "no channel configured, sweep results dropped"
                );
            }
        }
    }

    /// Sweep every configured category in order.
    pub async fn run_all(&self) {
        for category in &self.config.sweep.categories {
            self.run_category(category).await;
            sleep(std::time::Duration::from_secs(
                self.config.sweep.category_pause_secs,
            ))
            .await;
        }
    }

    /// Loop forever, sweeping all categories at the configured time of day.
    pub async fn run_daily(&self) {
        let time = parse_sweep_time(&self.config.sweep.time);

        loop {
            let wait = duration_until(Local::now().naive_local(), time);
            info!(
                sweep_time = %self.config.sweep.time,
                wait_secs = wait.num_seconds(),
                "scheduler sleeping until next sweep"
            );
            sleep(wait.to_std().unwrap_or_default()).await;

            self.run_all().await;
        }
    }
}

/// Parse `HH:MM`, falling back to midnight on bad input.
fn parse_sweep_time(raw: &str) -> NaiveTime {
    NaiveTime::parse_from_str(raw, "%H:%M").unwrap_or_else(|e| {
        warn!(raw, error = %e, "invalid sweep time, falling back to midnight");
        NaiveTime::MIN
    })
}

/// Time until the next occurrence of `target` after `now`.
fn duration_until(now: NaiveDateTime, target: NaiveTime) -> TimeDelta {
    let today = now.date().and_time(target);
    if today > now {
        today - now
    } else {
        today + TimeDelta::days(1) - now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .expect("date")
            .and_hms_opt(h, m, s)
            .expect("time")
    }

    #[test]
    fn waits_until_later_today() {
        let wait = duration_until(at(9, 0, 0), NaiveTime::from_hms_opt(18, 0, 0).expect("time"));
        assert_eq!(wait.num_hours(), 9);
    }

    #[test]
    fn rolls_over_to_tomorrow() {
        let wait = duration_until(at(1, 0, 0), NaiveTime::MIN);
        assert_eq!(wait.num_hours(), 23);
    }

    #[test]
    fn exact_tick_schedules_next_day() {
        let wait = duration_until(at(0, 0, 0), NaiveTime::MIN);
        assert_eq!(wait.num_hours(), 24);
    }

    #[test]
    fn bad_time_falls_back_to_midnight() {
        assert_eq!(parse_sweep_time("25:99"), NaiveTime::MIN);
        assert_eq!(parse_sweep_time("garbage"), NaiveTime::MIN);
        assert_eq!(
            parse_sweep_time("06:30"),
            NaiveTime::from_hms_opt(6, 30, 0).expect("time")
        );
    }
}
