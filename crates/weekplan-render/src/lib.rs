//! # weekplan-render
//!
//! Rendering backends for laid-out week plans.
//!
//! This crate provides:
//! - SVG week chart rendering
//! - XLSX weekly planner rendering (for the printed helpdesk plan)
//! - Text-based output
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveTime;
//! use weekplan_core::{Renderer, Session, WeekPlan, Weekday};
//! use weekplan_render::{SvgRenderer, TextRenderer};
//! use weekplan_solver::layout_sessions;
//!
//! let t = |h| NaiveTime::from_hms_opt(h, 0, 0).unwrap();
//! let plan = WeekPlan::new("Plan").sessions(vec![
//!     Session::new(Weekday::Monday, t(9), t(11)).tutor("Anna").location("WBS"),
//!     Session::new(Weekday::Monday, t(10), t(12)).tutor("Ben").location("Online"),
//! ]);
//! let layout = layout_sessions(&plan.sessions, &plan.week).unwrap();
//!
//! let svg = SvgRenderer::new().render(&plan, &layout).unwrap();
//! assert!(svg.contains("Anna"));
//!
//! let text = TextRenderer.render(&plan, &layout).unwrap();
//! assert!(text.contains("2/2"));
//! ```

pub mod excel;

pub use excel::ExcelRenderer;

use chrono::{NaiveTime, Timelike};
use std::fmt::Write as _;
use svg::node::element::{Group, Line, Rectangle, Text};
use svg::Document;
use tracing::{debug, warn};
use weekplan_core::{
    DayLayout, Placement, RenderError, Renderer, Session, SessionId, WeekLayout, WeekPlan,
};

/// Look up a laid-out session in the plan
pub(crate) fn session_for(plan: &WeekPlan, id: SessionId) -> Result<&Session, RenderError> {
    plan.sessions.get(id).ok_or_else(|| {
        RenderError::InvalidData(format!(
            "layout refers to session {id} but the plan has {} sessions",
            plan.sessions.len()
        ))
    })
}

/// Locations of all laid-out sessions in order of first appearance
pub(crate) fn locations(plan: &WeekPlan, layout: &WeekLayout) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for id in layout.session_order() {
        if let Some(session) = plan.sessions.get(id) {
            let location = session.location.trim();
            if !location.is_empty() && !seen.iter().any(|l| l.eq_ignore_ascii_case(location)) {
                seen.push(location.to_string());
            }
        }
    }
    seen
}

fn minutes_of(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// SVG week chart renderer configuration
#[derive(Clone, Debug)]
pub struct SvgRenderer {
    /// Width of a day with width factor 1, in pixels
    pub day_width: u32,
    /// Height of one hour in pixels
    pub hour_height: u32,
    /// Width of the hour label column in pixels
    pub time_label_width: u32,
    /// Title band height in pixels
    pub title_height: u32,
    /// Day label band height in pixels
    pub header_height: u32,
    /// Legend band height in pixels
    pub legend_height: u32,
    /// Padding around the chart
    pub padding: u32,
    /// Fill for sessions without session or location colour
    pub default_color: String,
    /// Background color
    pub background_color: String,
    /// Grid line color
    pub grid_color: String,
    /// Bar outline color
    pub border_color: String,
    /// Text color
    pub text_color: String,
    /// Font family
    pub font_family: String,
    /// Font size of axis labels and legend in pixels
    pub font_size: u32,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self {
            day_width: 220,
            hour_height: 60,
            time_label_width: 50,
            title_height: 40,
            header_height: 30,
            legend_height: 30,
            padding: 20,
            default_color: "#D9D9D9".into(),
            background_color: "#ffffff".into(),
            grid_color: "#d0d0d0".into(),
            border_color: "#7f7f7f".into(),
            text_color: "#2c3e50".into(),
            font_family: "system-ui, -apple-system, sans-serif".into(),
            font_size: 12,
        }
    }
}

/// Vertical extent of the chart in whole hours
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct HourSpan {
    first: u32,
    last: u32,
}

impl HourSpan {
    fn hours(&self) -> u32 {
        self.last - self.first
    }
}

impl SvgRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the width of a unit-width day
    pub fn day_width(mut self, width: u32) -> Self {
        self.day_width = width;
        self
    }

    /// Configure the height of one hour
    pub fn hour_height(mut self, height: u32) -> Self {
        self.hour_height = height;
        self
    }

    /// Grid hours, widened to cover every laid-out session
    fn hour_span(&self, plan: &WeekPlan, layout: &WeekLayout) -> HourSpan {
        let mut first = plan.grid_start;
        let mut last = plan.grid_end;
        for id in layout.session_order() {
            if let Some(session) = plan.sessions.get(id) {
                first = first.min(session.start);
                last = last.max(session.end);
            }
        }
        let first_hour = first.hour();
        let mut last_hour = last.hour();
        if last.minute() > 0 || last.second() > 0 {
            last_hour += 1;
        }
        HourSpan {
            first: first_hour,
            last: last_hour.max(first_hour + 1),
        }
    }

    fn chart_left(&self) -> f64 {
        (self.padding + self.time_label_width) as f64
    }

    fn chart_top(&self) -> f64 {
        (self.padding + self.title_height + self.header_height) as f64
    }

    /// Convert a time of day to y position
    fn time_to_y(&self, time: NaiveTime, span: HourSpan) -> f64 {
        let minutes = minutes_of(time) as f64 - (span.first * 60) as f64;
        self.chart_top() + minutes * self.hour_height as f64 / 60.0
    }

    /// Day label band and vertical day separators
    fn render_days(&self, plan: &WeekPlan, offsets: &[f64], span: HourSpan) -> Group {
        let mut group = Group::new().set("class", "days");
        let header_y = (self.padding + self.title_height) as f64;
        let bottom = self.chart_top() + (span.hours() * self.hour_height) as f64;

        for (slot, day) in plan.week.days.iter().enumerate() {
            let left = self.chart_left() + offsets[slot] * self.day_width as f64;
            let width = plan.week.day_width(slot) * self.day_width as f64;

            let label = format!("{} {}", day, plan.date_of(*day).format("%d.%m."));
            let text = Text::new(label)
                .set("x", left + width / 2.0)
                .set("y", header_y + self.header_height as f64 / 2.0 + 4.0)
                .set("font-family", self.font_family.as_str())
                .set("font-size", self.font_size + 1)
                .set("font-weight", "bold")
                .set("fill", self.text_color.as_str())
                .set("text-anchor", "middle");
            group = group.add(text);

            let line = Line::new()
                .set("x1", left)
                .set("y1", header_y)
                .set("x2", left)
                .set("y2", bottom)
                .set("stroke", self.grid_color.as_str())
                .set("stroke-width", 1);
            group = group.add(line);
        }

        let right = self.chart_left() + offsets.last().copied().unwrap_or(0.0) * self.day_width as f64;
        group.add(
            Line::new()
                .set("x1", right)
                .set("y1", header_y)
                .set("x2", right)
                .set("y2", bottom)
                .set("stroke", self.grid_color.as_str())
                .set("stroke-width", 1),
        )
    }

    /// Hour lines and hour labels
    fn render_hours(&self, chart_width: f64, span: HourSpan) -> Group {
        let mut group = Group::new().set("class", "hours");
        for hour in span.first..=span.last {
            let y = self.chart_top() + ((hour - span.first) * self.hour_height) as f64;
            let line = Line::new()
                .set("x1", self.chart_left())
                .set("y1", y)
                .set("x2", self.chart_left() + chart_width)
                .set("y2", y)
                .set("stroke", self.grid_color.as_str())
                .set("stroke-width", 1);
            group = group.add(line);

            let label = Text::new(format!("{hour:02}:00"))
                .set("x", self.chart_left() - 6.0)
                .set("y", y + 4.0)
                .set("font-family", self.font_family.as_str())
                .set("font-size", self.font_size.saturating_sub(1))
                .set("fill", self.text_color.as_str())
                .set("text-anchor", "end");
            group = group.add(label);
        }
        group
    }

    fn annotation(&self, content: &str, x: f64, y: f64, size: u32, anchor: &str) -> Text {
        Text::new(content)
            .set("x", x)
            .set("y", y)
            .set("font-family", self.font_family.as_str())
            .set("font-size", size)
            .set("fill", self.text_color.as_str())
            .set("text-anchor", anchor)
    }

    /// Render every session of one day
    fn render_day_sessions(
        &self,
        plan: &WeekPlan,
        day: &DayLayout,
        offsets: &[f64],
        span: HourSpan,
    ) -> Result<Group, RenderError> {
        let mut group = Group::new().set("class", "sessions");
        let day_left = self.chart_left() + offsets[day.slot] * self.day_width as f64;
        let day_px = plan.week.day_width(day.slot) * self.day_width as f64;

        for placed in &day.sessions {
            let session = session_for(plan, placed.id)?;
            let size = plan.font_sizes.select(session.duration())?;
            let bar = Placement {
                day: day.day,
                slot: day.slot,
                lane: placed.lane,
                lane_count: day.lane_count,
            }
            .bar(day_px);

            let x = day_left + bar.offset;
            let y = self.time_to_y(session.start, span);
            let height = self.time_to_y(session.end, span) - y;
            let fill = match plan.session_color(session) {
                Some(color) => color,
                None => {
                    warn!(session = placed.id, location = %session.location, "no colour for session, using default");
                    self.default_color.as_str()
                }
            };

            group = group.add(
                Rectangle::new()
                    .set("x", x)
                    .set("y", y)
                    .set("width", bar.width)
                    .set("height", height)
                    .set("fill", fill)
                    .set("stroke", self.border_color.as_str())
                    .set("stroke-width", 1),
            );

            let inset = 3.0;
            let line = size as f64 + 2.0;
            let right = x + bar.width - inset;
            let bottom = y + height - inset - 1.0;
            if !session.tutor.is_empty() {
                group = group.add(self.annotation(&session.tutor, x + inset, y + line, size, "start"));
            }
            if !session.topic.is_empty() {
                group = group.add(self.annotation(&session.topic, x + inset, y + 2.0 * line, size, "start"));
            }
            group = group.add(self.annotation(&session.time_range(), right, y + line, size, "end"));
            if let Some(room) = session.room.as_deref().filter(|r| !r.is_empty()) {
                group = group.add(self.annotation(room, right, bottom, size, "end"));
            }
            if !session.location.is_empty() {
                group = group.add(self.annotation(&session.location, x + inset, bottom, size, "start"));
            }
        }
        Ok(group)
    }

    /// One colour box per location
    fn render_legend(&self, plan: &WeekPlan, layout: &WeekLayout, y_offset: f64) -> Group {
        let mut group = Group::new().set("class", "legend");
        let box_size = 12.0;
        let spacing = 140.0;
        let y = y_offset + 15.0;

        for (i, location) in locations(plan, layout).iter().enumerate() {
            let x = self.padding as f64 + i as f64 * spacing;
            let color = plan.location_color(location).unwrap_or(self.default_color.as_str());
            group = group.add(
                Rectangle::new()
                    .set("x", x)
                    .set("y", y - box_size + 2.0)
                    .set("width", box_size)
                    .set("height", box_size)
                    .set("rx", 2)
                    .set("fill", color)
                    .set("stroke", self.border_color.as_str()),
            );
            group = group.add(
                Text::new(location.as_str())
                    .set("x", x + box_size + 5.0)
                    .set("y", y)
                    .set("font-family", self.font_family.as_str())
                    .set("font-size", self.font_size.saturating_sub(1))
                    .set("fill", self.text_color.as_str()),
            );
        }
        group
    }
}

impl Renderer for SvgRenderer {
    type Output = String;

    fn render(&self, plan: &WeekPlan, layout: &WeekLayout) -> Result<String, RenderError> {
        plan.week.validate()?;

        let span = self.hour_span(plan, layout);
        let offsets = plan.week.day_offsets();
        let chart_width = plan.week.total_width() * self.day_width as f64;
        let chart_height = (span.hours() * self.hour_height) as f64;

        let width = self.chart_left() + chart_width + self.padding as f64;
        let height = self.chart_top() + chart_height + (self.legend_height + self.padding) as f64;

        let mut document = Document::new()
            .set("width", width)
            .set("height", height)
            .set("viewBox", (0, 0, width, height))
            .set("xmlns", "http://www.w3.org/2000/svg");

        document = document.add(
            Rectangle::new()
                .set("width", "100%")
                .set("height", "100%")
                .set("fill", self.background_color.as_str()),
        );

        document = document.add(
            Text::new(plan.display_title())
                .set("x", self.padding)
                .set("y", self.padding + 20)
                .set("font-family", self.font_family.as_str())
                .set("font-size", self.font_size + 6)
                .set("font-weight", "bold")
                .set("fill", self.text_color.as_str()),
        );

        document = document.add(self.render_hours(chart_width, span));
        document = document.add(self.render_days(plan, &offsets, span));

        for day in &layout.days {
            if day.slot >= plan.week.len() {
                return Err(RenderError::InvalidData(format!(
                    "layout slot {} for {} is outside the {}-day week",
                    day.slot,
                    day.day,
                    plan.week.len()
                )));
            }
            document = document.add(self.render_day_sessions(plan, day, &offsets, span)?);
        }

        let legend_y = self.chart_top() + chart_height + 5.0;
        document = document.add(self.render_legend(plan, layout, legend_y));

        debug!(sessions = layout.placed_count(), hours = span.hours(), "rendered week chart");

        let mut output = Vec::new();
        svg::write(&mut output, &document)
            .map_err(|e| RenderError::Format(format!("Failed to write SVG: {}", e)))?;

        String::from_utf8(output).map_err(|e| RenderError::Format(format!("Invalid UTF-8: {}", e)))
    }
}

/// Plain text renderer for console output
#[derive(Clone, Copy, Debug, Default)]
pub struct TextRenderer;

impl Renderer for TextRenderer {
    type Output = String;

    fn render(&self, plan: &WeekPlan, layout: &WeekLayout) -> Result<String, RenderError> {
        let fmt_err = |e: std::fmt::Error| RenderError::Format(e.to_string());
        let mut out = String::new();
        writeln!(out, "{}", plan.display_title()).map_err(fmt_err)?;

        for day in &layout.days {
            let noun = if day.lane_count == 1 { "lane" } else { "lanes" };
            writeln!(out).map_err(fmt_err)?;
            writeln!(out, "{} ({} {noun})", day.day, day.lane_count).map_err(fmt_err)?;
            for placed in &day.sessions {
                let session = session_for(plan, placed.id)?;
                let lane = format!("{}/{}", placed.lane + 1, day.lane_count);
                let time = session.time_range();
                let fields: Vec<&str> = [
                    lane.as_str(),
                    time.as_str(),
                    session.tutor.as_str(),
                    session.topic.as_str(),
                    session.location.as_str(),
                ]
                .into_iter()
                .filter(|f| !f.is_empty())
                .collect();
                writeln!(out, "  {}", fields.join("  ")).map_err(fmt_err)?;
            }
        }

        if !layout.rejected.is_empty() {
            writeln!(out).map_err(fmt_err)?;
            writeln!(out, "Skipped:").map_err(fmt_err)?;
            for err in &layout.rejected {
                writeln!(out, "  {err}").map_err(fmt_err)?;
            }
        }

        Ok(out)
    }
}
