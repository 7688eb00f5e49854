//! Axis-orientation swapper
//!
//! Exchanges the X and Y channels together with everything that refers to
//! them by position: title texts, plot bands and `{i}` field references in
//! the tooltip template. Swapping twice restores the binding.
//!
//! Tooltip references index the Y fields first, then the X fields.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::{debug, info};

use crate::binding::{ChartBinding, ChartDescriptor, ChartFamily, ChartFieldRef};
use crate::normalize::order;

static FIELD_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{(\d+)((?:,[^}]*)?)\}").expect("valid field reference pattern"));

/// Swap X and Y in place
pub fn swap_axes(binding: &mut ChartBinding, descriptor: &mut ChartDescriptor) {
    info!(chart_type = %binding.chart_type, "swapping axes");
    let before = tooltip_fields(binding);

    if binding.chart_type.family() == ChartFamily::Map {
        swap_map_dimensions(binding);
    } else {
        swap_channels(binding);

        let titles = &mut descriptor.titles;
        std::mem::swap(&mut titles.x.text, &mut titles.y.text);
        std::mem::swap(&mut titles.x2.text, &mut titles.y2.text);
        let plot = &mut descriptor.plot;
        std::mem::swap(&mut plot.x_band, &mut plot.y_band);
    }

    if let Some(tooltip) = binding.tooltip.as_deref() {
        let mapping = index_mapping(&before, &tooltip_fields(binding));
        binding.tooltip = Some(remap_tooltip(tooltip, &mapping));
    }
}

fn swap_channels(binding: &mut ChartBinding) {
    if binding.is_scatter_matrix() {
        debug!("scatter matrix: series frames travel with their fields");
    }

    // Measures whose type cannot be drawn horizontally stay on Y
    let view: &ChartBinding = binding;
    let blocked: Vec<bool> = view
        .y_fields
        .iter()
        .map(|f| match f.as_aggregate() {
            Some(agg) => !view.effective_type(agg).supports_inverted(),
            None => false,
        })
        .collect();

    let old_x = std::mem::take(&mut binding.x_fields);
    let old_y = std::mem::take(&mut binding.y_fields);
    let mut new_x = Vec::with_capacity(old_y.len());
    let mut kept_on_y = Vec::new();
    for (field, blocked) in old_y.into_iter().zip(blocked) {
        if blocked {
            debug!(field = %field, "measure cannot move to the inverted axis");
            kept_on_y.push(field);
        } else {
            new_x.push(field);
        }
    }
    let mut new_y = old_x;
    new_y.extend(kept_on_y);

    binding.x_fields = new_x;
    binding.y_fields = new_y;
    order::sort_axis_channels(binding);
}

/// Map X/Y carry point offsets, so only dimensions change sides
fn swap_map_dimensions(binding: &mut ChartBinding) {
    let (x_dims, x_measures): (Vec<ChartFieldRef>, Vec<ChartFieldRef>) =
        std::mem::take(&mut binding.x_fields)
            .into_iter()
            .partition(|f| f.is_dimension());
    let (y_dims, y_measures): (Vec<ChartFieldRef>, Vec<ChartFieldRef>) =
        std::mem::take(&mut binding.y_fields)
            .into_iter()
            .partition(|f| f.is_dimension());

    binding.x_fields = y_dims.into_iter().chain(x_measures).collect();
    binding.y_fields = x_dims.into_iter().chain(y_measures).collect();
}

/// Full names in tooltip reference order
fn tooltip_fields(binding: &ChartBinding) -> Vec<String> {
    binding
        .y_fields
        .iter()
        .chain(binding.x_fields.iter())
        .map(|f| f.full_name())
        .collect()
}

/// New position of every old field, matched by name
///
/// Repeated names are matched in order, so the n-th occurrence before maps
/// to the n-th occurrence after.
pub fn index_mapping(before: &[String], after: &[String]) -> Vec<usize> {
    let mut taken = vec![false; after.len()];
    before
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let found = after
                .iter()
                .enumerate()
                .position(|(j, candidate)| !taken[j] && candidate == name);
            match found {
                Some(j) => {
                    taken[j] = true;
                    j
                }
                None => i,
            }
        })
        .collect()
}

/// Rewrite `{i}` references through `mapping`
///
/// `mapping[i]` is the new index of reference `i`. References outside the
/// mapping are left alone. Every reference is rewritten in a single pass so
/// a rewritten index is never remapped again.
pub fn remap_tooltip(template: &str, mapping: &[usize]) -> String {
    FIELD_REFERENCE
        .replace_all(template, |caps: &Captures| {
            let suffix = caps.get(2).map_or("", |m| m.as_str());
            match caps[1].parse::<usize>().ok().and_then(|i| mapping.get(i)) {
                Some(j) => format!("{{{}{}}}", j, suffix),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}
