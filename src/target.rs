//! Histogram and canvas records that expressions edit, and the `Subject`
//! capability through which the evaluator reaches them.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::expr::{CanvasFunction, Field, HistogramFunction};

/// Drawing directives set by histogram functions. Unset directives are left
/// out of the output.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_color: Option<i16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_width: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_style: Option<i16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker_color: Option<i16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker_style: Option<i16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker_size: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<i16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draw_option: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normalize: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub x_title: String,
    #[serde(default)]
    pub y_title: String,
    #[serde(default)]
    pub z_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legend: Option<String>,
    /// Directory path inside the input document, filled during traversal.
    #[serde(default)]
    pub path: String,
    /// Input document identifier, filled during traversal.
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub style: Style,
}

impl Histogram {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn field(&self, field: Field) -> String {
        match field {
            Field::Group | Field::Name => self.name.clone(),
            Field::Title => self.title.clone(),
            Field::XLabel => self.x_title.clone(),
            Field::YLabel => self.y_title.clone(),
            Field::ZLabel => self.z_title.clone(),
            Field::Legend => self.legend.clone().unwrap_or_default(),
            Field::Path => self.path.clone(),
            Field::Origin => self.origin.clone(),
        }
    }

    /// Store `value` into a writable metadata field. Returns false for
    /// fields that only exist as evaluation inputs.
    pub fn set_field(&mut self, field: Field, value: &str) -> bool {
        let slot = match field {
            Field::Title => &mut self.title,
            Field::XLabel => &mut self.x_title,
            Field::YLabel => &mut self.y_title,
            Field::ZLabel => &mut self.z_title,
            Field::Legend => {
                self.legend = Some(value.to_string());
                return true;
            }
            Field::Group | Field::Name | Field::Path | Field::Origin => return false,
        };
        *slot = value.to_string();
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub top: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            left: 0.1,
            right: 0.1,
            bottom: 0.1,
            top: 0.1,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisSwitches {
    pub x: bool,
    pub y: bool,
    pub z: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub margins: Margins,
    pub log: AxisSwitches,
    pub ticks: AxisSwitches,
    pub grid: AxisSwitches,
}

/// What the evaluator needs from the thing an expression list runs against.
pub trait Subject {
    /// Native metadata used as version 0 of `field`.
    fn intrinsic(&self, field: Field) -> String;

    /// Write back the final value of an edited field.
    fn assign(&mut self, field: Field, value: &str);

    fn apply_histogram(&mut self, function: &HistogramFunction);

    fn apply_canvas(&mut self, function: &CanvasFunction) {
        warn!(function = %function, "canvas function has no canvas to act on");
    }
}

impl Subject for Histogram {
    fn intrinsic(&self, field: Field) -> String {
        self.field(field)
    }

    fn assign(&mut self, field: Field, value: &str) {
        self.set_field(field, value);
    }

    fn apply_histogram(&mut self, function: &HistogramFunction) {
        function.call(self);
    }
}

/// A canvas together with the group it displays. The group key stands in for
/// the name; every other field is read from and written to the group's first
/// histogram.
pub struct CanvasSubject<'a> {
    pub canvas: &'a mut Canvas,
    pub key: &'a str,
    pub histograms: &'a mut [Histogram],
}

impl Subject for CanvasSubject<'_> {
    fn intrinsic(&self, field: Field) -> String {
        match field {
            Field::Group | Field::Name => self.key.to_string(),
            other => self
                .histograms
                .first()
                .map(|lead| lead.field(other))
                .unwrap_or_default(),
        }
    }

    fn assign(&mut self, field: Field, value: &str) {
        if let Some(lead) = self.histograms.first_mut() {
            lead.set_field(field, value);
        }
    }

    fn apply_histogram(&mut self, function: &HistogramFunction) {
        for histogram in self.histograms.iter_mut() {
            function.call(histogram);
        }
    }

    fn apply_canvas(&mut self, function: &CanvasFunction) {
        function.call(self.canvas);
    }
}

#[cfg(test)]
mod tests {
    use super::{Canvas, CanvasSubject, Histogram, Subject};
    use crate::expr::Field;
    use crate::function::Functions;

    fn sample() -> Histogram {
        Histogram {
            title: "Jet pT".to_string(),
            x_title: "pT [GeV]".to_string(),
            path: "jets/central".to_string(),
            origin: "mc.json".to_string(),
            ..Histogram::named("h_jet_pt")
        }
    }

    #[test]
    fn histogram_intrinsics_follow_field_letters() {
        let histogram = sample();
        assert_eq!(histogram.intrinsic(Field::Name), "h_jet_pt");
        assert_eq!(histogram.intrinsic(Field::Title), "Jet pT");
        assert_eq!(histogram.intrinsic(Field::XLabel), "pT [GeV]");
        assert_eq!(histogram.intrinsic(Field::Legend), "");
        assert_eq!(histogram.intrinsic(Field::Path), "jets/central");
        assert_eq!(histogram.intrinsic(Field::Origin), "mc.json");
    }

    #[test]
    fn only_display_fields_are_writable() {
        let mut histogram = sample();
        assert!(histogram.set_field(Field::YLabel, "Events"));
        assert!(histogram.set_field(Field::Legend, "MC"));
        assert!(!histogram.set_field(Field::Name, "renamed"));
        assert!(!histogram.set_field(Field::Origin, "other"));
        assert_eq!(histogram.y_title, "Events");
        assert_eq!(histogram.legend.as_deref(), Some("MC"));
        assert_eq!(histogram.name, "h_jet_pt");
    }

    #[test]
    fn canvas_subject_reads_key_and_lead_histogram() {
        let mut canvas = Canvas::default();
        let mut histograms = vec![sample(), Histogram::named("other")];
        let mut subject = CanvasSubject {
            canvas: &mut canvas,
            key: "jet_pt",
            histograms: &mut histograms,
        };
        assert_eq!(subject.intrinsic(Field::Name), "jet_pt");
        assert_eq!(subject.intrinsic(Field::Title), "Jet pT");

        subject.assign(Field::Title, "Leading jet");
        assert_eq!(histograms[0].title, "Leading jet");
        assert_eq!(histograms[1].title, "");
    }

    #[test]
    fn canvas_subject_spreads_histogram_functions_over_group() {
        let functions = Functions::builtin().expect("builtin registries");
        let width = functions
            .histogram
            .make("line_width", "2")
            .expect("valid call");
        let margin = functions
            .canvas
            .make("margin", "0.2")
            .expect("valid call");

        let mut canvas = Canvas::default();
        let mut histograms = vec![Histogram::named("a"), Histogram::named("b")];
        let mut subject = CanvasSubject {
            canvas: &mut canvas,
            key: "group",
            histograms: &mut histograms,
        };
        subject.apply_histogram(&width);
        subject.apply_canvas(&margin);

        assert!(histograms.iter().all(|h| h.style.line_width == Some(2.0)));
        assert_eq!(canvas.margins.left, 0.2);
    }

    #[test]
    fn histogram_ignores_canvas_functions() {
        let functions = Functions::builtin().expect("builtin registries");
        let log = functions.canvas.make("log", "y").expect("valid call");
        let mut histogram = sample();
        histogram.apply_canvas(&log);
        assert_eq!(histogram, sample());
    }
}
