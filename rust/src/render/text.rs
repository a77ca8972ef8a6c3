//! Terminal Gantt chart.

use std::fmt::Write;

use crate::allocator::Allocation;

use super::RenderError;

const GLYPHS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
const FREE: char = '.';

/// Glyph of the job at position `sequence`; glyphs repeat after 62 jobs.
pub fn job_glyph(sequence: usize) -> char {
    GLYPHS[sequence % GLYPHS.len()] as char
}

/// Render the allocation as text: one row per `(machine, core)` slot, one
/// column per time step, followed by a legend.
pub fn render_text(allocation: &Allocation) -> Result<String, RenderError> {
    let range = allocation.time_range;
    let steps = range.steps();
    let slots = allocation.layout.total_slots() as usize;
    let mut rows: Vec<Vec<char>> = Vec::with_capacity(slots);
    for _ in 0..slots {
        let mut row = Vec::new();
        row.try_reserve_exact(steps)
            .map_err(|_| RenderError::ChartTooLarge { steps })?;
        row.resize(steps, FREE);
        rows.push(row);
    }

    for (sequence, job) in allocation.jobs.iter().enumerate() {
        let glyph = job_glyph(sequence);
        let (first, last) = match (range.offset(job.start_time), range.offset(job.finish_time)) {
            (Some(first), Some(last)) if first <= last => (first, last),
            _ => {
                return Err(RenderError::OutOfRange {
                    job: job.id.clone(),
                    start_time: job.start_time,
                    finish_time: job.finish_time,
                })
            }
        };
        for &core in &job.cores {
            let slot = allocation
                .layout
                .slot(&job.machine, core)
                .ok_or_else(|| RenderError::UnknownSlot {
                    job: job.id.clone(),
                    machine: job.machine.clone(),
                    core,
                })?;
            for cell in &mut rows[slot as usize][first..=last] {
                *cell = glyph;
            }
        }
    }

    let labels: Vec<String> = allocation
        .layout
        .slots()
        .map(|(machine, core, _)| format!("{}/{}", machine, core))
        .collect();
    let label_width = labels.iter().map(|l| l.len()).max().unwrap_or(0).max(4);

    let mut out = String::new();
    writeln!(
        out,
        "{:>width$} {} .. {}",
        "time",
        range.min_time(),
        range.max_time(),
        width = label_width
    )?;
    for (label, row) in labels.iter().zip(&rows) {
        let line: String = row.iter().collect();
        writeln!(out, "{:>width$} {}", label, line, width = label_width)?;
    }
    writeln!(out)?;
    for (sequence, job) in allocation.jobs.iter().enumerate() {
        writeln!(
            out,
            "{} {} [{}, {}] machine {} cores {:?}",
            job_glyph(sequence),
            job.id,
            job.start_time,
            job.finish_time,
            job.machine,
            job.cores
        )?;
    }
    Ok(out)
}
