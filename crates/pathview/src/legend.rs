//! Analysis legend.
//!
//! The legend is a vertical color bar to the right of the diagram, with the
//! maximum of the analysis scale at the top, a boundary label above and
//! below it, and optional ticks marking the values of the selected and
//! analysis-highlighted entities.
//!
//! # Geometry
//!
//! The bar is as tall as the diagram, up to the configured legend height,
//! and its width shrinks by the same factor. For the default 70×350 legend
//! a 200 pixel tall diagram gets a 40×200 bar.
//!
//! # Columns
//!
//! Multi-column expression data is animated one column per frame.
//! [`Legend::set_column`] drops the previous ticks and recomputes them for
//! the new column; the bar geometry and labels do not change.

use log::{debug, trace};

use pathview_core::{
    draw::{
        FontSpec, LayeredOutput, Primitive, RenderLayer, StrokeDefinition, TextMeasure, TextPrimitive,
        shape, text_fit,
    },
    geometry::{Bounds, Point, Size},
    gradient::Gradient,
    semantic::{AnalysisBinding, AnalysisDataset, AnalysisType, DecorationSet},
};

use crate::{config::RenderConfig, error::PathviewError, profile::ColorProfile};

/// p-value at and above which an entity gets the minimum enrichment color.
pub const ENRICHMENT_THRESHOLD: f64 = 0.05;

/// Upper bound on the number of slices drawn for the gradient bar.
const MAX_BAR_SLICES: usize = 256;

/// Gap between the bar and its labels.
const LABEL_GAP: f32 = 2.0;

/// Median of a sorted slice.
///
/// An even count averages the two central elements. Returns `None` for an
/// empty slice.
///
/// ```
/// use pathview::legend::median;
///
/// assert_eq!(median(&[1.0, 2.0, 3.0]), Some(2.0));
/// assert_eq!(median(&[1.0, 2.0, 3.0, 4.0]), Some(2.5));
/// assert_eq!(median(&[5.0]), Some(5.0));
/// ```
pub fn median(sorted: &[f64]) -> Option<f64> {
    let n = sorted.len();
    match n {
        0 => None,
        _ if n % 2 == 0 => Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0),
        _ => Some(sorted[n / 2]),
    }
}

/// The ticks of one entity: its single value, else min, median and max.
///
/// Non-finite values are ignored.
pub fn tick_values(mut values: Vec<f64>) -> Vec<f64> {
    values.retain(|v| v.is_finite());
    values.sort_by(f64::total_cmp);
    match values.as_slice() {
        [] => Vec::new(),
        [single] => vec![*single],
        [first, .., last] => {
            let mid = median(&values).unwrap_or(*first);
            vec![*first, mid, *last]
        }
    }
}

/// How analysis values map onto the color scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scale {
    /// Linear between the global expression range
    Expression { min: f64, max: f64 },
    /// `1 - p / 0.05`, so the most significant entities get the maximum color
    Enrichment,
}

impl Scale {
    /// The scale of a dataset, or `None` without an analysis.
    pub fn for_analysis(analysis: &AnalysisDataset) -> Option<Self> {
        match analysis.analysis_type() {
            AnalysisType::None => None,
            AnalysisType::Expression => {
                let (min, max) = analysis.expression_range().unwrap_or((0.0, 0.0));
                Some(Self::Expression { min, max })
            }
            AnalysisType::Enrichment | AnalysisType::SpeciesComparison => Some(Self::Enrichment),
        }
    }

    /// The raw value a binding contributes at `column`.
    pub fn value(&self, binding: &AnalysisBinding, column: usize) -> Option<f64> {
        match self {
            Self::Expression { .. } => binding.expression_at(column),
            Self::Enrichment => binding.p_value(),
        }
    }

    /// The values a binding exposes to the ticks at `column`.
    pub fn tick_series(&self, binding: &AnalysisBinding, column: usize) -> Vec<f64> {
        match self {
            Self::Expression { .. } => binding.series_at(column),
            Self::Enrichment => binding.p_value().into_iter().collect(),
        }
    }

    /// Position of a value on the gradient, in `[0, 1]`.
    ///
    /// An empty expression range puts every value in the middle.
    pub fn fraction(&self, value: f64) -> f32 {
        let t = match *self {
            Self::Expression { min, max } if max > min => (value - min) / (max - min),
            Self::Expression { .. } => 0.5,
            Self::Enrichment => 1.0 - value / ENRICHMENT_THRESHOLD,
        };
        if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) as f32 }
    }

    pub fn gradient<'p>(&self, profile: &'p ColorProfile) -> &'p Gradient {
        match self {
            Self::Expression { .. } => &profile.analysis().expression,
            Self::Enrichment => &profile.analysis().enrichment,
        }
    }

    /// Labels of the top and bottom of the bar.
    pub fn labels(&self) -> (String, String) {
        match *self {
            Self::Expression { min, max } => (format!("{max:.2E}"), format!("{min:.2E}")),
            Self::Enrichment => ("0".to_string(), ENRICHMENT_THRESHOLD.to_string()),
        }
    }
}

/// The legend of one render request.
#[derive(Debug, Clone, PartialEq)]
pub struct Legend {
    scale: Scale,
    bar: Bounds,
    font: FontSpec,
    label_height: f32,
    column: usize,
    ticks: Vec<f32>,
}

impl Legend {
    /// Places the legend next to `diagram`, the diagram's extent on the canvas.
    ///
    /// Returns `None` when there is no analysis to explain.
    pub fn new(
        diagram: Bounds,
        config: &RenderConfig,
        analysis: &AnalysisDataset,
        measure: &dyn TextMeasure,
    ) -> Option<Self> {
        let scale = Scale::for_analysis(analysis)?;
        let size = Self::bar_size(diagram.height(), config.legend_size());
        let font = config.label_font().clone();
        let label_height = measure.line_height(&font);
        let top_left = Point::new(
            diagram.max_x() + config.legend_margin(),
            diagram.min_y() + label_height + LABEL_GAP,
        );
        let bar = Bounds::new_from_top_left(top_left, size);
        debug!(width = size.width(), height = size.height(), scale:? = scale; "Legend placed");
        Some(Self {
            scale,
            bar,
            font,
            label_height,
            column: 0,
            ticks: Vec::new(),
        })
    }

    /// Bar size for a diagram of the given height.
    ///
    /// The configured size is the maximum; a shorter diagram shrinks both
    /// sides proportionally.
    pub fn bar_size(diagram_height: f32, max: Size) -> Size {
        let height = diagram_height.min(max.height()).max(0.0);
        let width = if max.height() > 0.0 {
            max.width() * height / max.height()
        } else {
            0.0
        };
        Size::new(width, height)
    }

    pub fn scale(&self) -> Scale {
        self.scale
    }

    pub fn bar(&self) -> Bounds {
        self.bar
    }

    pub fn column(&self) -> usize {
        self.column
    }

    /// Canvas y coordinates of the current ticks, top to bottom order not guaranteed.
    pub fn ticks(&self) -> &[f32] {
        &self.ticks
    }

    /// Region covered by the bar, its labels and tick overhang.
    pub fn extent(&self, config: &RenderConfig) -> Bounds {
        let overhang = config.tick_overhang();
        let label = self.label_height + LABEL_GAP;
        Bounds::new(
            self.bar.min_x() - overhang,
            self.bar.min_y() - label,
            self.bar.max_x() + overhang,
            self.bar.max_y() + label,
        )
    }

    /// Canvas y coordinate of a gradient position.
    pub fn tick_y(&self, fraction: f32) -> f32 {
        self.bar.max_y() - fraction * self.bar.height()
    }

    /// Switches to `column`, replacing the ticks.
    ///
    /// Each selected or analysis-highlighted entity adds its own ticks: one
    /// for a single value, min/median/max for a complex with bound components.
    pub fn set_column(&mut self, column: usize, analysis: &AnalysisDataset, decoration: &DecorationSet) {
        self.column = column;
        self.ticks.clear();

        let ticks: Vec<f32> = decoration
            .selected()
            .union(decoration.analysis_highlighted())
            .filter_map(|id| analysis.binding(*id))
            .flat_map(|binding| tick_values(self.scale.tick_series(binding, column)))
            .map(|value| self.tick_y(self.scale.fraction(value)))
            .collect();
        trace!(column, ticks:? = ticks; "Legend ticks computed");
        self.ticks = ticks;
    }

    /// The column-independent part: background, gradient bar, border and labels.
    pub fn render(
        &self,
        profile: &ColorProfile,
        config: &RenderConfig,
        measure: &dyn TextMeasure,
    ) -> Result<LayeredOutput, PathviewError> {
        let mut out = LayeredOutput::new();
        let palette = profile.legend();
        let bar = self.bar;

        out.add_to_layer(
            RenderLayer::Legend,
            Primitive::fill(shape::rectangle(self.extent(config)), palette.background),
        )?;

        let gradient = self.scale.gradient(profile);
        let slices = (bar.height().ceil() as usize).clamp(1, MAX_BAR_SLICES);
        let step = bar.height() / slices as f32;
        for i in 0..slices {
            let bottom = bar.max_y() - i as f32 * step;
            let slice = Bounds::new(bar.min_x(), bottom - step, bar.max_x(), bottom);
            let color = gradient.interpolate((i as f32 + 0.5) / slices as f32);
            out.add_to_layer(RenderLayer::Legend, Primitive::fill(shape::rectangle(slice), color))?;
        }
        out.add_to_layer(
            RenderLayer::Legend,
            Primitive::draw(
                shape::rectangle(bar),
                StrokeDefinition::solid(palette.border, config.node_border_width()),
            ),
        )?;

        let (top, bottom) = self.scale.labels();
        let overhang = config.tick_overhang();
        let row = |y: f32| {
            Bounds::new(
                bar.min_x() - overhang,
                y,
                bar.max_x() + overhang,
                y + self.label_height,
            )
        };
        let rows = [
            (top, row(bar.min_y() - LABEL_GAP - self.label_height)),
            (bottom, row(bar.max_y() + LABEL_GAP)),
        ];
        for (label, area) in rows {
            let text = text_fit::layout(vec![label], self.font.clone(), area, measure);
            out.add_to_layer(
                RenderLayer::LegendText,
                Primitive::Text(TextPrimitive::new(text, palette.text, area)),
            )?;
        }
        Ok(out)
    }

    /// One line across the bar per tick.
    pub fn render_ticks(
        &self,
        profile: &ColorProfile,
        config: &RenderConfig,
    ) -> Result<LayeredOutput, PathviewError> {
        let mut out = LayeredOutput::new();
        let stroke = StrokeDefinition::solid(profile.legend().tick, config.selection_width());
        let overhang = config.tick_overhang();
        for &y in &self.ticks {
            let line = shape::stop_bar(
                Point::new(self.bar.min_x() - overhang, y),
                Point::new(self.bar.max_x() + overhang, y),
            );
            out.add_to_layer(RenderLayer::LegendTicks, Primitive::draw(line, stroke.clone()))?;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use pathview_core::{draw::ApproximateMeasure, semantic::ReactomeId};

    use super::*;

    fn expression(values: &[(u64, f64)]) -> AnalysisDataset {
        values.iter().fold(
            AnalysisDataset::new(AnalysisType::Expression).with_range(0.0, 10.0),
            |analysis, (id, value)| {
                analysis.with_binding(ReactomeId::new(*id), AnalysisBinding::Expression { values: vec![*value] })
            },
        )
    }

    fn legend(height: f32, analysis: &AnalysisDataset) -> Legend {
        let diagram = Bounds::new(15.0, 15.0, 415.0, 15.0 + height);
        Legend::new(diagram, &RenderConfig::default(), analysis, &ApproximateMeasure::default()).unwrap()
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[]), None);
        assert_eq!(median(&[1.0, 2.0, 3.0]), Some(2.0));
        assert_eq!(median(&[1.0, 2.0, 3.0, 4.0]), Some(2.5));
        assert_eq!(median(&[5.0]), Some(5.0));
    }

    #[test]
    fn test_tick_values() {
        assert_eq!(tick_values(vec![]), Vec::<f64>::new());
        assert_eq!(tick_values(vec![7.0]), vec![7.0]);
        assert_eq!(tick_values(vec![8.0, 2.0, 4.0]), vec![2.0, 4.0, 8.0]);
        assert_eq!(tick_values(vec![1.0, 3.0]), vec![1.0, 2.0, 3.0]);
        assert_eq!(tick_values(vec![f64::NAN, 3.0]), vec![3.0]);
    }

    #[test]
    fn test_short_diagram_shrinks_bar() {
        let size = Legend::bar_size(200.0, Size::new(70.0, 350.0));
        assert_approx_eq!(f32, size.width(), 40.0);
        assert_approx_eq!(f32, size.height(), 200.0);

        let capped = Legend::bar_size(900.0, Size::new(70.0, 350.0));
        assert_approx_eq!(f32, capped.width(), 70.0);
        assert_approx_eq!(f32, capped.height(), 350.0);
    }

    #[test]
    fn test_no_legend_without_analysis() {
        let diagram = Bounds::new(0.0, 0.0, 100.0, 100.0);
        let legend = Legend::new(
            diagram,
            &RenderConfig::default(),
            &AnalysisDataset::none(),
            &ApproximateMeasure::default(),
        );
        assert!(legend.is_none());
    }

    #[test]
    fn test_legend_sits_right_of_diagram() {
        let legend = legend(200.0, &expression(&[]));
        assert_approx_eq!(f32, legend.bar().min_x(), 415.0 + 20.0);
        assert!(legend.bar().min_y() > 15.0);
    }

    #[test]
    fn test_complex_ticks_span_its_components() {
        let analysis = expression(&[(4, 9.5)]).with_binding(
            ReactomeId::new(1),
            AnalysisBinding::Components {
                values: vec![5.0],
                components: vec![vec![8.0], vec![2.0], vec![3.0], vec![4.0]],
            },
        );
        let decoration = DecorationSet::new().with_selected([ReactomeId::new(1)]);
        let mut legend = legend(200.0, &analysis);
        legend.set_column(0, &analysis, &decoration);

        // min 2, median 3.5, max 8
        let bar = legend.bar();
        let expected = [0.2_f32, 0.35, 0.8].map(|t| bar.max_y() - t * bar.height());
        assert_eq!(legend.ticks().len(), 3);
        for (tick, want) in legend.ticks().iter().zip(expected) {
            assert_approx_eq!(f32, *tick, want, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_single_values_tick_once_each() {
        let analysis = expression(&[(1, 1.0), (2, 3.0), (3, 6.0)]);
        let decoration = DecorationSet::new().with_selected([ReactomeId::new(1), ReactomeId::new(2)]);
        let mut legend = legend(200.0, &analysis);
        legend.set_column(0, &analysis, &decoration);

        let bar = legend.bar();
        let expected = [0.1_f32, 0.3].map(|t| bar.max_y() - t * bar.height());
        assert_eq!(legend.ticks().len(), 2);
        for (tick, want) in legend.ticks().iter().zip(expected) {
            assert_approx_eq!(f32, *tick, want, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_highlighted_entities_tick_after_selected() {
        let analysis = expression(&[(1, 2.0), (2, 4.0), (3, 8.0), (4, 9.5)]);
        let decoration = DecorationSet::new()
            .with_selected([ReactomeId::new(1), ReactomeId::new(3)])
            .with_analysis_highlighted([ReactomeId::new(2)]);
        let mut legend = legend(200.0, &analysis);
        legend.set_column(0, &analysis, &decoration);

        let bar = legend.bar();
        let expected = [0.2_f32, 0.8, 0.4].map(|t| bar.max_y() - t * bar.height());
        assert_eq!(legend.ticks().len(), 3);
        for (tick, want) in legend.ticks().iter().zip(expected) {
            assert_approx_eq!(f32, *tick, want, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_set_column_replaces_ticks() {
        let analysis = AnalysisDataset::new(AnalysisType::Expression)
            .with_range(0.0, 10.0)
            .with_binding(ReactomeId::new(1), AnalysisBinding::Expression { values: vec![5.0, 10.0] });
        let decoration = DecorationSet::new().with_selected([ReactomeId::new(1)]);
        let mut legend = legend(350.0, &analysis);

        legend.set_column(0, &analysis, &decoration);
        assert_eq!(legend.ticks().len(), 1);
        assert_approx_eq!(f32, legend.ticks()[0], legend.bar().center().y(), epsilon = 1e-3);

        let bar_before = legend.bar();
        legend.set_column(1, &analysis, &decoration);
        assert_eq!(legend.ticks().len(), 1);
        assert_approx_eq!(f32, legend.ticks()[0], legend.bar().min_y(), epsilon = 1e-3);
        assert_eq!(legend.bar(), bar_before);
        assert_eq!(legend.column(), 1);

        legend.set_column(2, &analysis, &decoration);
        assert!(legend.ticks().is_empty());
    }

    #[test]
    fn test_enrichment_scale() {
        let scale = Scale::Enrichment;
        assert_eq!(scale.fraction(0.0), 1.0);
        assert_eq!(scale.fraction(0.05), 0.0);
        assert_eq!(scale.fraction(0.5), 0.0);
        assert_approx_eq!(f32, scale.fraction(0.025), 0.5);
        assert_eq!(scale.labels(), ("0".to_string(), "0.05".to_string()));
    }

    #[test]
    fn test_expression_labels_use_scientific_notation() {
        let scale = Scale::Expression { min: 0.0, max: 10.0 };
        assert_eq!(scale.labels(), ("1.00E1".to_string(), "0.00E0".to_string()));
        assert_eq!(Scale::Expression { min: 3.0, max: 3.0 }.fraction(3.0), 0.5);
    }

    #[test]
    fn test_render_layers() {
        let analysis = expression(&[(1, 5.0)]);
        let mut legend = legend(200.0, &analysis);
        let profile = ColorProfile::builtin("modern").unwrap();
        let config = RenderConfig::default();
        let out = legend.render(&profile, &config, &ApproximateMeasure::default()).unwrap();
        // background, 200 slices, border
        assert_eq!(out.primitives(RenderLayer::Legend).len(), 202);
        assert_eq!(out.primitives(RenderLayer::LegendText).len(), 2);

        legend.set_column(0, &analysis, &DecorationSet::new().with_selected([ReactomeId::new(1)]));
        let ticks = legend.render_ticks(&profile, &config).unwrap();
        assert_eq!(ticks.primitives(RenderLayer::LegendTicks).len(), 1);
    }
}
