//! Template resolution and merge
//!
//! Every catalogue goes through the same pipeline: take the template's widgets in
//! declaration order, apply the zone adaptation (removals first, then additions), and
//! instantiate each survivor with one timestamp captured per call.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{
    Adaptation, ClimateContext, Template, TemplateKind, TemplateWidget, Widget, WidgetKind,
};

/// Per-call instantiation parameters
#[derive(Debug, Clone, Copy)]
pub struct ComposeOptions<'a> {
    pub current_location: &'a str,
    pub timestamp: DateTime<Utc>,
    /// Overlay `climateAdapted` and `seasonalMode` onto every widget
    pub force_adaptive_flags: bool,
}

/// Instance id for the widget at `index` of a composition stamped at `timestamp`
pub fn instance_id(timestamp: DateTime<Utc>, index: usize) -> String {
    format!("{}-{}", timestamp.timestamp_millis(), index)
}

/// Turn one template widget into a dashboard widget
pub fn instantiate(widget: &TemplateWidget, index: usize, options: &ComposeOptions<'_>) -> Widget {
    let settings = if options.force_adaptive_flags {
        widget.settings.with_adaptive_flags()
    } else {
        widget.settings.clone()
    };

    Widget {
        id: instance_id(options.timestamp, index),
        kind: widget.kind.clone(),
        title: widget.title.clone(),
        location: widget.location.resolve(options.current_location),
        size: widget.size,
        position: widget.position,
        settings,
    }
}

/// Template widgets after applying `adaptation`
///
/// Widgets whose type tag is listed in `removedWidgets` are dropped, then the
/// adaptation's additional widgets are appended after the survivors. Added widgets are
/// not subject to the removal list.
pub fn merge_adaptation<'a>(
    widgets: &'a [TemplateWidget],
    adaptation: Option<&'a Adaptation>,
) -> Vec<&'a TemplateWidget> {
    match adaptation {
        None => widgets.iter().collect(),
        Some(adaptation) => widgets
            .iter()
            .filter(|widget| {
                !adaptation
                    .removed_widgets
                    .iter()
                    .any(|removed| removed == widget.kind.as_str())
            })
            .chain(adaptation.additional_widgets.iter())
            .collect(),
    }
}

/// Merge and instantiate in one step
pub fn compose_widgets(
    widgets: &[TemplateWidget],
    adaptation: Option<&Adaptation>,
    options: &ComposeOptions<'_>,
) -> Vec<Widget> {
    merge_adaptation(widgets, adaptation)
        .into_iter()
        .enumerate()
        .map(|(index, widget)| instantiate(widget, index, options))
        .collect()
}

/// Resolve a template against the climate context and produce the widget set that
/// replaces the dashboard's
///
/// Returns `None` when an adaptive template is applied before the climate zone has
/// been resolved; plain templates ignore the climate context entirely.
pub fn apply_template<T: Template + ?Sized>(
    template: &T,
    climate: Option<&ClimateContext>,
    current_location: &str,
    now: DateTime<Utc>,
) -> Option<Vec<Widget>> {
    let adaptive = template.kind() == TemplateKind::Adaptive;

    let adaptation = if adaptive {
        let context = climate.filter(|context| !context.is_loading)?;
        template.adaptation_for(&context.climate_data.climate_zone)
    } else {
        None
    };

    let options = ComposeOptions {
        current_location,
        timestamp: now,
        force_adaptive_flags: adaptive,
    };

    Some(compose_widgets(template.widgets(), adaptation, &options))
}

/// What applying an adaptive template would do for a zone
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdaptationPreview {
    pub template_id: String,
    pub zone_id: String,
    pub base_widgets: Vec<String>,
    pub added_widgets: Vec<String>,
    pub removed_types: Vec<WidgetKind>,
    pub modifications: Vec<String>,
    /// Widgets the dashboard ends up with after removal and addition
    pub total_widgets: usize,
}

pub fn preview_adaptation<T: Template + ?Sized>(template: &T, zone_id: &str) -> AdaptationPreview {
    let adaptation = template.adaptation_for(zone_id);
    let titles = |widgets: &[TemplateWidget]| -> Vec<String> {
        widgets.iter().map(|widget| widget.title.clone()).collect()
    };

    AdaptationPreview {
        template_id: template.id().to_string(),
        zone_id: zone_id.to_string(),
        base_widgets: titles(template.widgets()),
        added_widgets: adaptation
            .map(|a| titles(&a.additional_widgets))
            .unwrap_or_default(),
        removed_types: adaptation
            .map(|a| a.removed_widgets.iter().map(|tag| WidgetKind::parse(tag)).collect())
            .unwrap_or_default(),
        modifications: adaptation
            .map(|a| a.modifications.clone())
            .unwrap_or_default(),
        total_widgets: merge_adaptation(template.widgets(), adaptation).len(),
    }
}
