//! SVG Gantt chart.

use std::fmt::Write;
use std::path::Path;

use crate::allocator::Allocation;
use crate::config::{Hatch, RenderConfig};
use crate::models::TimeStep;

use super::{job_style, RenderError};

const MARGIN_LEFT: f64 = 90.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 20.0;
const MARGIN_BOTTOM: f64 = 70.0;
const MAX_TIME_TICKS: i64 = 20;
const HATCH_SIZE: u32 = 8;

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

fn hatch_path(hatch: Hatch) -> String {
    let s = HATCH_SIZE;
    match hatch {
        Hatch::Diagonal => format!("M0,{s} L{s},0 M-1,1 L1,-1 M{a},{b} L{b},{a}", a = s - 1, b = s + 1),
        Hatch::Vertical => format!("M{h},0 L{h},{s}", h = s / 2),
        Hatch::Cross => format!("M0,0 L{s},{s} M{s},0 L0,{s}"),
    }
}

/// Maps chart coordinates (time, slot units) to pixels.
struct Frame {
    min_time: TimeStep,
    time_span: f64,
    y_max: f64,
    plot_width: f64,
    plot_height: f64,
}

impl Frame {
    fn x(&self, time: f64) -> f64 {
        MARGIN_LEFT + (time - self.min_time as f64) / self.time_span * self.plot_width
    }

    fn y(&self, value: f64) -> f64 {
        MARGIN_TOP + self.plot_height - value / self.y_max * self.plot_height
    }
}

fn time_tick_step(span: i64) -> i64 {
    (span / MAX_TIME_TICKS + i64::from(span % MAX_TIME_TICKS != 0)).max(1)
}

/// Tick positions from `min_time` to `max_time`, stopping before overflow.
fn time_ticks(
    min_time: TimeStep,
    max_time: TimeStep,
    step: i64,
) -> impl Iterator<Item = TimeStep> {
    std::iter::successors(Some(min_time), move |&tick| tick.checked_add(step))
        .take_while(move |&tick| tick <= max_time)
}

/// Render the allocation as an SVG document.
///
/// The x axis covers `[min_time, max_time]`; every `(job, core)` rectangle is
/// `finish_time - start_time` wide and one slot high.
pub fn render_svg(allocation: &Allocation, config: &RenderConfig) -> Result<String, RenderError> {
    let width = f64::from(config.width);
    let height = f64::from(config.height);
    let slot_height = f64::from(config.slot_height);
    let range = allocation.time_range;
    let span = range.max_time() - range.min_time();
    let frame = Frame {
        min_time: range.min_time(),
        time_span: span.max(1) as f64,
        y_max: (f64::from(allocation.layout.total_slots()) * slot_height).max(1.0),
        plot_width: (width - MARGIN_LEFT - MARGIN_RIGHT).max(1.0),
        plot_height: (height - MARGIN_TOP - MARGIN_BOTTOM).max(1.0),
    };
    let plot_bottom = MARGIN_TOP + frame.plot_height;
    let plot_right = MARGIN_LEFT + frame.plot_width;

    let mut out = String::new();
    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif">"#,
        w = config.width,
        h = config.height
    )?;
    writeln!(out, "<defs>")?;
    for hatch in &config.hatches {
        writeln!(
            out,
            r#"<pattern id="hatch-{name}" patternUnits="userSpaceOnUse" width="{s}" height="{s}"><path d="{d}" stroke="black" stroke-width="0.5"/></pattern>"#,
            name = hatch.name(),
            s = HATCH_SIZE,
            d = hatch_path(*hatch)
        )?;
    }
    writeln!(out, "</defs>")?;
    writeln!(out, r#"<rect width="100%" height="100%" fill="white"/>"#)?;

    // Grid: minor lines at every core slot, vertical lines at time ticks
    writeln!(out, r##"<g stroke="#b0b0b0" stroke-width="0.8">"##)?;
    for (_, _, slot) in allocation.layout.slots() {
        let y = frame.y(f64::from(slot) * slot_height);
        writeln!(
            out,
            r#"<line x1="{MARGIN_LEFT}" y1="{y:.2}" x2="{plot_right:.2}" y2="{y:.2}"/>"#
        )?;
    }
    let tick_step = time_tick_step(span);
    for tick in time_ticks(range.min_time(), range.max_time(), tick_step) {
        let x = frame.x(tick as f64);
        writeln!(
            out,
            r#"<line x1="{x:.2}" y1="{MARGIN_TOP}" x2="{x:.2}" y2="{plot_bottom:.2}"/>"#
        )?;
    }
    writeln!(out, "</g>")?;

    for (sequence, job) in allocation.jobs.iter().enumerate() {
        let (color, hatch) = job_style(config, sequence)?;
        let x0 = frame.x(job.start_time as f64);
        let x1 = frame.x(job.finish_time as f64);
        let label_x =
            frame.x(job.start_time as f64 + (job.finish_time as f64 - job.start_time as f64) / 2.0);
        for &core in &job.cores {
            let slot = allocation
                .layout
                .slot(&job.machine, core)
                .ok_or_else(|| RenderError::UnknownSlot {
                    job: job.id.clone(),
                    machine: job.machine.clone(),
                    core,
                })?;
            let bottom = f64::from(slot) * slot_height;
            let top_px = frame.y(bottom + slot_height);
            let height_px = frame.y(bottom) - top_px;
            for fill in [color.to_string(), format!("url(#hatch-{})", hatch.name())] {
                writeln!(
                    out,
                    r#"<rect x="{x0:.2}" y="{top_px:.2}" width="{w:.2}" height="{height_px:.2}" fill="{fill}" stroke="black" stroke-width="0.5"/>"#,
                    w = x1 - x0
                )?;
            }
            writeln!(
                out,
                r#"<text x="{label_x:.2}" y="{y:.2}" font-size="10" text-anchor="middle" dominant-baseline="central">{id}</text>"#,
                y = frame.y(bottom + slot_height / 2.0),
                id = escape(&job.id)
            )?;
        }
    }

    // Axes
    writeln!(
        out,
        r#"<rect x="{MARGIN_LEFT}" y="{MARGIN_TOP}" width="{pw:.2}" height="{ph:.2}" fill="none" stroke="black"/>"#,
        pw = frame.plot_width,
        ph = frame.plot_height
    )?;
    for tick in time_ticks(range.min_time(), range.max_time(), tick_step) {
        writeln!(
            out,
            r#"<text x="{x:.2}" y="{y:.2}" font-size="12" text-anchor="middle">{tick}</text>"#,
            x = frame.x(tick as f64),
            y = plot_bottom + 18.0
        )?;
    }
    for band in allocation.layout.bands() {
        if band.cores == 0 {
            continue;
        }
        let y = frame.y(f64::from(band.first_slot) * slot_height);
        writeln!(
            out,
            r#"<line x1="{x1:.2}" y1="{y:.2}" x2="{MARGIN_LEFT}" y2="{y:.2}" stroke="black"/>"#,
            x1 = MARGIN_LEFT - 8.0
        )?;
        writeln!(
            out,
            r#"<text x="{x:.2}" y="{y:.2}" font-size="12" text-anchor="end" dominant-baseline="central">{key}</text>"#,
            x = MARGIN_LEFT - 13.0,
            key = escape(&band.key)
        )?;
    }
    writeln!(
        out,
        r#"<text x="{x:.2}" y="{y:.2}" font-size="16" text-anchor="middle">Time</text>"#,
        x = MARGIN_LEFT + frame.plot_width / 2.0,
        y = height - 20.0
    )?;
    writeln!(
        out,
        r#"<text transform="translate(24 {y:.2}) rotate(-90)" font-size="16" text-anchor="middle">Machine/Core</text>"#,
        y = MARGIN_TOP + frame.plot_height / 2.0
    )?;
    writeln!(out, "</svg>")?;
    Ok(out)
}

/// Render the allocation and write it to `path`.
pub fn write_svg(
    allocation: &Allocation,
    config: &RenderConfig,
    path: &Path,
) -> Result<(), RenderError> {
    if path.extension().and_then(|e| e.to_str()) != Some("svg") {
        log::warn!(
            "Chart is written as SVG regardless of the extension of {}",
            path.display()
        );
    }
    let document = render_svg(allocation, config)?;
    std::fs::write(path, document)?;
    log::info!("Chart written to {}", path.display());
    Ok(())
}
