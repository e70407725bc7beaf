// Horizontal bar chart of the ranking.

use course_ranking::RankingRow;
use log::info;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use std::path::Path;

use crate::corerank::*;

pub const CHART_TITLE: &str = "MAcc Core Courses \u{2014} Most Beneficial Ranking";
pub const X_AXIS_LABEL: &str = "Average Rank (Lower = More Beneficial)";
pub const Y_AXIS_LABEL: &str = "Course";

const BAR_COLOR: RGBColor = RGBColor(0x2E, 0x86, 0xAB);
// 10 inches at 200 dpi.
const CHART_WIDTH: u32 = 2000;
const MIN_CHART_HEIGHT: u32 = 800;
const ROW_HEIGHT: u32 = 120;

/// Pixel size of the chart. The height grows with the number of courses.
pub fn chart_size(num_rows: usize) -> (u32, u32) {
    let height = (ROW_HEIGHT * num_rows as u32 + 200).max(MIN_CHART_HEIGHT);
    (CHART_WIDTH, height)
}

/// Width of the area holding the course names, from the longest name.
fn label_area_width(rankings: &[RankingRow]) -> i32 {
    let longest = rankings
        .iter()
        .map(|r| r.course.chars().count())
        .max()
        .unwrap_or(0) as i32;
    (longest * 14 + 60).clamp(160, 700)
}

/// Segment of the y axis holding the i-th row. The first row is at the top.
fn segment_of(idx: usize, num_rows: usize) -> usize {
    num_rows - 1 - idx
}

/// The row drawn in the given segment of the y axis.
fn row_at(segment: usize, num_rows: usize) -> Option<usize> {
    if segment < num_rows {
        Some(num_rows - 1 - segment)
    } else {
        None
    }
}

/// Draws the ranking as a PNG bar chart, one bar per row, annotated with its value.
pub fn draw_ranking_chart(path: &Path, rankings: &[RankingRow]) -> CoreRankResult<()> {
    render(path, rankings).map_err(|e| CoreRankError::RenderingChart {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    info!("Chart saved: {}", path.display());
    Ok(())
}

fn render(path: &Path, rankings: &[RankingRow]) -> Result<(), Box<dyn std::error::Error>> {
    let n = rankings.len();
    let root = BitMapBackend::new(path, chart_size(n)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_rank = rankings.iter().map(|r| r.avg_rank).fold(0.0_f64, f64::max);
    // Leave room for the annotations at the tip of the bars.
    let x_max = if max_rank > 0.0 { max_rank * 1.15 } else { 1.0 };
    let segments = n.max(1);

    let mut chart = ChartBuilder::on(&root)
        .caption(CHART_TITLE, ("sans-serif", 44))
        .margin(30)
        .x_label_area_size(100)
        .y_label_area_size(label_area_width(rankings))
        .build_cartesian_2d(0f64..x_max, (0usize..segments).into_segmented())?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .bold_line_style(&BLACK.mix(0.25))
        .light_line_style(&WHITE.mix(0.0))
        .x_desc(X_AXIS_LABEL)
        .y_desc(Y_AXIS_LABEL)
        .axis_desc_style(("sans-serif", 30))
        .label_style(("sans-serif", 26))
        .y_labels(segments + 1)
        .x_label_formatter(&|x| format!("{:.1}", x))
        .y_label_formatter(&|y| match y {
            SegmentValue::CenterOf(segment) => row_at(*segment, n)
                .map(|idx| rankings[idx].course.clone())
                .unwrap_or_default(),
            _ => String::new(),
        })
        .draw()?;

    chart.draw_series(
        Histogram::horizontal(&chart)
            .style(BAR_COLOR.filled())
            .margin(12)
            .data(
                rankings
                    .iter()
                    .enumerate()
                    .map(|(idx, r)| (segment_of(idx, n), r.avg_rank)),
            ),
    )?;

    let value_style =
        TextStyle::from(("sans-serif", 24).into_font()).pos(Pos::new(HPos::Left, VPos::Center));
    chart.draw_series(rankings.iter().enumerate().map(|(idx, r)| {
        Text::new(
            format!(" {:.2}", r.avg_rank),
            (r.avg_rank, SegmentValue::CenterOf(segment_of(idx, n))),
            value_style.clone(),
        )
    }))?;

    root.present()?;
    Ok(())
}
