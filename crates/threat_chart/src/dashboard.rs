use std::{collections::BTreeMap, fmt, time::Duration};

use crate::{
    aggregate::{Aggregation, aggregate_with_report},
    chart::{BarChart, ChartSpec},
    color::Rgb,
    config::Config,
    domain::Domains,
    error::Result,
    reconcile::{Delta, Timing},
    record::{DimValue, Dimension, ThreatRecord},
};

/// Addresses one chart of the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChartId {
    Aggregate,
    Facet(u8),
}

impl fmt::Display for ChartId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartId::Aggregate => write!(f, "aggregate"),
            ChartId::Facet(severity) => write!(f, "severity_{}", severity),
        }
    }
}

/// What one data pass did to the charts
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardUpdate {
    pub aggregate: Delta,
    pub facets: BTreeMap<u8, Delta>,
    /// facets removed because their severity left the domain
    pub dropped_facets: Vec<u8>,
    /// records missing country, year or severity
    pub dropped_records: usize,
}

/// The charts of one selected task: the country/year aggregate and one facet
/// per severity, all bound to the same domains.
#[derive(Debug, Clone)]
pub struct TaskDashboard {
    config: Config,
    palette: Vec<Rgb>,
    timing: Timing,
    task: Option<String>,
    records: Vec<ThreatRecord>,
    domains: Domains,
    aggregate: BarChart,
    facets: BTreeMap<u8, BarChart>,
    dropped_records: usize,
}

impl TaskDashboard {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let palette = config.palette()?;
        let timing = config.timing();
        let aggregate = BarChart::new(
            ChartSpec::country_year(),
            config.aggregate.clone(),
            palette.clone(),
            timing,
        );
        Ok(Self {
            config,
            palette,
            timing,
            task: None,
            records: Vec::new(),
            domains: Domains::default(),
            aggregate,
            facets: BTreeMap::new(),
            dropped_records: 0,
        })
    }

    /// Switches to another task. Domains are rebuilt and every filter is reset.
    pub fn load_task(
        &mut self,
        name: &str,
        records: Vec<ThreatRecord>,
        now: Duration,
    ) -> DashboardUpdate {
        log::info!("Loading task '{}' ({} records)", name, records.len());
        self.task = Some(name.to_string());
        self.domains = Domains::from_records(&records);
        self.records = records;
        self.bind(now)
    }

    /// New records for the current task. Domains only grow so bars of
    /// unchanged rows keep their position; filters are reset.
    pub fn refresh(&mut self, records: Vec<ThreatRecord>, now: Duration) -> DashboardUpdate {
        self.domains = self.domains.union(&Domains::from_records(&records));
        self.records = records;
        self.bind(now)
    }

    fn bind(&mut self, now: Duration) -> DashboardUpdate {
        let overview = aggregate_with_report(&self.records, &self.aggregate.spec().group_dims());
        let facet_dims = ChartSpec::severity_facet(0).group_dims();
        let detail = aggregate_with_report(&self.records, &facet_dims);
        self.dropped_records = detail.dropped;

        let aggregate = self.bind_chart(ChartId::Aggregate, &overview, now);

        let severities: Vec<u8> = self
            .domains
            .get(Dimension::Severity)
            .iter()
            .filter_map(DimValue::as_int)
            .filter_map(|s| u8::try_from(s).ok())
            .collect();

        let dropped_facets: Vec<u8> = self
            .facets
            .keys()
            .copied()
            .filter(|s| !severities.contains(s))
            .collect();
        for severity in &dropped_facets {
            log::debug!("Dropping facet for severity {}", severity);
            self.facets.remove(severity);
        }

        let mut facets = BTreeMap::new();
        for severity in severities {
            if !self.facets.contains_key(&severity) {
                let chart = BarChart::new(
                    ChartSpec::severity_facet(severity),
                    self.config.facet.clone(),
                    self.palette.clone(),
                    self.timing,
                );
                self.facets.insert(severity, chart);
            }
            let delta = self.bind_chart(ChartId::Facet(severity), &detail, now);
            facets.insert(severity, delta);
        }

        DashboardUpdate {
            aggregate,
            facets,
            dropped_facets,
            dropped_records: self.dropped_records,
        }
    }

    fn bind_chart(&mut self, id: ChartId, agg: &Aggregation, now: Duration) -> Delta {
        let domains = &self.domains;
        let chart = match id {
            ChartId::Aggregate => &mut self.aggregate,
            ChartId::Facet(severity) => match self.facets.get_mut(&severity) {
                Some(chart) => chart,
                None => return Delta::default(),
            },
        };
        log::debug!("{}: binding {} rows", id, agg.rows.len());
        chart.load(&agg.rows, domains, now)
    }

    /// Flips a filter value on one chart
    pub fn toggle(&mut self, id: ChartId, value: &DimValue, now: Duration) -> Option<Delta> {
        self.chart_mut(id)?.toggle(value, now)
    }

    /// Flips `value` on every chart filtering by `dim`; returns how many
    /// charts changed
    pub fn toggle_dimension(&mut self, dim: Dimension, value: &DimValue, now: Duration) -> usize {
        self.charts_mut()
            .filter(|(_, chart)| chart.spec().filter == dim)
            .filter_map(|(_, chart)| chart.toggle(value, now))
            .count()
    }

    /// Advances every chart; returns the number of bars removed
    pub fn tick(&mut self, now: Duration) -> usize {
        self.charts_mut().map(|(_, chart)| chart.tick(now).len()).sum()
    }

    pub fn is_animating(&self, now: Duration) -> bool {
        self.charts().any(|(_, chart)| chart.is_animating(now))
    }

    pub fn chart(&self, id: ChartId) -> Option<&BarChart> {
        match id {
            ChartId::Aggregate => Some(&self.aggregate),
            ChartId::Facet(severity) => self.facets.get(&severity),
        }
    }

    pub fn chart_mut(&mut self, id: ChartId) -> Option<&mut BarChart> {
        match id {
            ChartId::Aggregate => Some(&mut self.aggregate),
            ChartId::Facet(severity) => self.facets.get_mut(&severity),
        }
    }

    /// Aggregate first, then facets by ascending severity
    pub fn charts(&self) -> impl Iterator<Item = (ChartId, &BarChart)> {
        std::iter::once((ChartId::Aggregate, &self.aggregate)).chain(
            self.facets
                .iter()
                .map(|(s, chart)| (ChartId::Facet(*s), chart)),
        )
    }

    pub fn charts_mut(&mut self) -> impl Iterator<Item = (ChartId, &mut BarChart)> {
        std::iter::once((ChartId::Aggregate, &mut self.aggregate)).chain(
            self.facets
                .iter_mut()
                .map(|(s, chart)| (ChartId::Facet(*s), chart)),
        )
    }

    pub fn aggregate_chart(&self) -> &BarChart {
        &self.aggregate
    }

    pub fn facet(&self, severity: u8) -> Option<&BarChart> {
        self.facets.get(&severity)
    }

    pub fn facet_severities(&self) -> impl Iterator<Item = u8> + '_ {
        self.facets.keys().copied()
    }

    pub fn task_name(&self) -> Option<&str> {
        self.task.as_deref()
    }

    pub fn records(&self) -> &[ThreatRecord] {
        &self.records
    }

    pub fn domains(&self) -> &Domains {
        &self.domains
    }

    pub fn dropped_records(&self) -> usize {
        self.dropped_records
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
