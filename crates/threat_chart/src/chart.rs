use std::{collections::BTreeSet, time::Duration};

use crate::{
    aggregate::{CompositeKey, GroupedRow},
    color::Rgb,
    config::ChartLayout,
    constants::AGGREGATE_TITLE,
    domain::Domains,
    error::Result,
    filter::FilterState,
    interaction::{HoverEvent, InteractionLayer, Point, Tooltip},
    reconcile::{Delta, ElementStore, Timing, compute_required_set},
    record::{DimValue, Dimension},
    scale::{Scales, build_scales},
    visualization::{self, Legend, build_legend},
};

/// Which dimensions a chart variant places, colors and filters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSpec {
    pub title: String,
    /// band along the x axis
    pub outer: Dimension,
    /// bars inside each outer band
    pub inner: Dimension,
    pub color: Dimension,
    pub filter: Dimension,
    pub legend_title: String,
    /// additional grouping dimension pinned to a single value
    pub facet: Option<(Dimension, DimValue)>,
}

impl ChartSpec {
    /// Years along x, one bar per country
    pub fn country_year() -> Self {
        Self {
            title: AGGREGATE_TITLE.to_string(),
            outer: Dimension::Year,
            inner: Dimension::Country,
            color: Dimension::Country,
            filter: Dimension::Country,
            legend_title: "Country".to_string(),
            facet: None,
        }
    }

    /// Countries along x, one bar per year, restricted to one severity
    pub fn severity_facet(severity: u8) -> Self {
        Self {
            title: format!("Severity {} - Country vs Year", severity),
            outer: Dimension::Country,
            inner: Dimension::Year,
            color: Dimension::Year,
            filter: Dimension::Year,
            legend_title: "Year".to_string(),
            facet: Some((Dimension::Severity, DimValue::from(severity))),
        }
    }

    /// Grouping dimensions in canonical order
    pub fn group_dims(&self) -> Vec<Dimension> {
        let mut dims: BTreeSet<Dimension> = [self.outer, self.inner, self.color, self.filter]
            .into_iter()
            .collect();
        if let Some((dim, _)) = &self.facet {
            dims.insert(*dim);
        }
        dims.into_iter().collect()
    }

    fn accepts(&self, row: &GroupedRow) -> bool {
        match &self.facet {
            Some((dim, value)) => row.value(*dim) == Some(value),
            None => true,
        }
    }
}

/// One grouped bar chart with its own filter, bars and hover state.
#[derive(Debug, Clone)]
pub struct BarChart {
    spec: ChartSpec,
    layout: ChartLayout,
    palette: Vec<Rgb>,
    rows: Vec<GroupedRow>,
    scales: Scales,
    filter: FilterState,
    store: ElementStore,
    interaction: InteractionLayer,
}

impl BarChart {
    pub fn new(spec: ChartSpec, layout: ChartLayout, palette: Vec<Rgb>, timing: Timing) -> Self {
        let scales = build_scales(&[], &Domains::default(), &spec, &layout, &palette);
        let filter = FilterState::new(spec.filter);
        Self {
            spec,
            layout,
            palette,
            rows: Vec::new(),
            scales,
            filter,
            store: ElementStore::new(timing),
            interaction: InteractionLayer::new(),
        }
    }

    /// Binds a new data set. Every filter value becomes active again.
    pub fn load(&mut self, rows: &[GroupedRow], domains: &Domains, now: Duration) -> Delta {
        self.filter.reset(&domains.get(self.spec.filter));
        self.set_rows(rows, domains, now)
    }

    fn set_rows(&mut self, rows: &[GroupedRow], domains: &Domains, now: Duration) -> Delta {
        self.rows = rows.iter().filter(|r| self.spec.accepts(r)).cloned().collect();
        self.scales = build_scales(&self.rows, domains, &self.spec, &self.layout, &self.palette);
        self.render_pass(now)
    }

    /// Flips one filter value; `None` when the value is unknown to the chart
    pub fn toggle(&mut self, value: &DimValue, now: Duration) -> Option<Delta> {
        let active = self.filter.toggle(value)?;
        log::info!(
            "{}: {} {} {}",
            self.spec.title,
            self.spec.filter,
            value,
            if active { "shown" } else { "hidden" }
        );
        Some(self.render_pass(now))
    }

    fn render_pass(&mut self, now: Duration) -> Delta {
        let required = compute_required_set(&self.rows, &self.scales, &self.filter, &self.spec);
        let delta = self.store.reconcile_to(&required, now);
        self.interaction.sync(&self.store);
        delta
    }

    /// Advances lifecycles to `now`; returns keys of bars that finished exiting
    pub fn tick(&mut self, now: Duration) -> Vec<CompositeKey> {
        let removed = self.store.tick(now);
        self.interaction.sync(&self.store);
        removed
    }

    pub fn pointer_move(&mut self, pointer: Point, now: Duration) -> HoverEvent {
        self.interaction.pointer_move(&self.store, pointer, now)
    }

    pub fn pointer_leave(&mut self) -> HoverEvent {
        self.interaction.pointer_leave()
    }

    pub fn has_data(&self) -> bool {
        !self.rows.is_empty()
    }

    pub fn is_animating(&self, now: Duration) -> bool {
        self.store.is_animating(now)
    }

    pub fn legend(&self) -> Legend {
        build_legend(&self.scales.color, &self.spec.legend_title)
    }

    /// Standalone SVG document of the chart as drawn at `now`
    pub fn to_svg(&self, now: Duration) -> Result<String> {
        let mut buf = Vec::new();
        visualization::render_chart_svg(&mut buf, self, now)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    pub fn spec(&self) -> &ChartSpec {
        &self.spec
    }

    pub fn layout(&self) -> &ChartLayout {
        &self.layout
    }

    pub fn rows(&self) -> &[GroupedRow] {
        &self.rows
    }

    pub fn scales(&self) -> &Scales {
        &self.scales
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn elements(&self) -> &ElementStore {
        &self.store
    }

    pub fn tooltip(&self) -> &Tooltip {
        self.interaction.tooltip()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{aggregate::aggregate, config::Config, record::ThreatRecord};

    const DONE: Duration = Duration::from_secs(5);

    fn chart(spec: ChartSpec) -> BarChart {
        let config = Config::default();
        let layout = if spec.facet.is_some() {
            config.facet.clone()
        } else {
            config.aggregate.clone()
        };
        BarChart::new(spec, layout, config.palette().unwrap(), config.timing())
    }

    fn records() -> Vec<ThreatRecord> {
        vec![
            ThreatRecord::new("China", 2020, 5),
            ThreatRecord::new("China", 2020, 5),
            ThreatRecord::new("USA", 2020, 3),
            ThreatRecord::new("USA", 2021, 5),
        ]
    }

    #[test]
    fn test_group_dims() {
        use Dimension::*;
        assert_eq!(ChartSpec::country_year().group_dims(), vec![Country, Year]);
        assert_eq!(
            ChartSpec::severity_facet(3).group_dims(),
            vec![Country, Year, Severity]
        );
        assert_eq!(
            ChartSpec::severity_facet(3).title,
            "Severity 3 - Country vs Year"
        );
    }

    #[test]
    fn test_facet_keeps_only_its_severity() {
        let recs = records();
        let domains = Domains::from_records(&recs);
        let spec = ChartSpec::severity_facet(5);
        let rows = aggregate(&recs, &spec.group_dims());
        let mut facet = chart(spec);
        let delta = facet.load(&rows, &domains, Duration::ZERO);

        assert_eq!(facet.rows().len(), 2);
        assert_eq!(delta.created().count(), 2);
        assert_eq!(facet.scales().magnitude.domain(), (0.0, 2.0));
    }

    #[test]
    fn test_toggle_rerenders_with_same_rows() {
        let recs = records();
        let domains = Domains::from_records(&recs);
        let spec = ChartSpec::country_year();
        let rows = aggregate(&recs, &spec.group_dims());
        let mut c = chart(spec);
        c.load(&rows, &domains, Duration::ZERO);
        c.tick(DONE);

        let rows_before = c.rows().to_vec();
        let delta = c.toggle(&DimValue::from("USA"), DONE).unwrap();
        assert_eq!(delta.updated().count(), 2);
        assert_eq!(c.rows(), rows_before.as_slice());
        assert!(c.toggle(&DimValue::from("Mars"), DONE).is_none());
    }

    #[test]
    fn test_load_resets_filter() {
        let recs = records();
        let domains = Domains::from_records(&recs);
        let spec = ChartSpec::country_year();
        let rows = aggregate(&recs, &spec.group_dims());
        let mut c = chart(spec);
        c.load(&rows, &domains, Duration::ZERO);
        c.toggle(&DimValue::from("USA"), Duration::ZERO);
        assert!(!c.filter().is_active(&DimValue::from("USA")));

        let fewer = aggregate(&recs[..2], &c.spec().group_dims());
        c.load(&fewer, &Domains::from_records(&recs[..2]), DONE);
        assert!(c.filter().all_active());
        assert_eq!(c.filter().domain().len(), 1);
    }

    #[test]
    fn test_no_data_chart() {
        let mut c = chart(ChartSpec::country_year());
        let delta = c.load(&[], &Domains::default(), Duration::ZERO);
        assert!(delta.changes.is_empty());
        assert!(!c.has_data());
        assert!(c.to_svg(Duration::ZERO).unwrap().contains("No data"));
    }

    #[test]
    fn test_hover_through_chart() {
        let recs = records();
        let domains = Domains::from_records(&recs);
        let spec = ChartSpec::country_year();
        let rows = aggregate(&recs, &spec.group_dims());
        let mut c = chart(spec);
        c.load(&rows, &domains, Duration::ZERO);
        c.tick(DONE);

        let target = *c.elements().iter().next().unwrap().target();
        let p = Point::new(target.x + 1.0, target.y + 1.0);
        assert!(matches!(c.pointer_move(p, DONE), HoverEvent::Entered(_)));
        assert!(c.tooltip().visible);
        assert!(c.to_svg(DONE).unwrap().contains("Threats: 2"));
        assert!(matches!(c.pointer_leave(), HoverEvent::Left(_)));
    }

    #[test]
    fn test_toggle_off_hides_tooltip() {
        let recs = records();
        let domains = Domains::from_records(&recs);
        let spec = ChartSpec::country_year();
        let rows = aggregate(&recs, &spec.group_dims());
        let mut c = chart(spec);
        c.load(&rows, &domains, Duration::ZERO);
        c.tick(DONE);

        let usa = c
            .elements()
            .iter()
            .find(|el| el.row().value(Dimension::Country) == Some(&DimValue::from("USA")))
            .unwrap();
        let target = *usa.target();
        let p = Point::new(target.x + 1.0, target.y + 1.0);
        assert!(matches!(c.pointer_move(p, DONE), HoverEvent::Entered(_)));

        c.toggle(&DimValue::from("USA"), DONE).unwrap();
        c.tick(DONE * 2);
        assert!(!c.tooltip().visible);
        assert!(!c.to_svg(DONE * 2).unwrap().contains("tooltip"));
        assert_eq!(c.pointer_move(p, DONE * 2), HoverEvent::Idle);
    }
}
