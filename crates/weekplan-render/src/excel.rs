//! XLSX weekly planner renderer
//!
//! Writes the printable helpdesk plan as a single `Wochenplan` sheet:
//!
//! ```text
//! | Helpdeskplan für KW 13                                  |
//! | Zeit  | Montag 25.03.   | Dienstag 26.03. | ...         |
//! | 08:00 |        |        |        |        |             |
//! | 08:30 | Anna   |        |        |        |             |
//! | 09:00 | Mathe  | Ben    |        |        |             |
//! | 09:30 |        | Physik |        |        |             |
//! ```
//!
//! Every day gets `max(lane_count, min_day_columns)` columns. Lane `i` of
//! `k` covers columns `[i*c/k, (i+1)*c/k)` of the day's `c` columns, so a
//! day with at most two lanes keeps the familiar left/right halves. A
//! session covers the slot rows from `(start - grid_start) / slot` to
//! `(end - grid_start) / slot - 1`, merged into one cell with the location
//! fill and a thick border.

use chrono::NaiveTime;
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet, XlsxError};
use std::collections::HashMap;
use tracing::{debug, warn};
use weekplan_core::{DayLayout, RenderError, Renderer, SessionId, WeekLayout, WeekPlan};

use crate::session_for;

fn xlsx_error(e: XlsxError) -> RenderError {
    RenderError::Format(format!("Failed to write planner: {e}"))
}

/// Parse `#RRGGBB` (or `RRGGBB`) into an RGB value
pub fn parse_hex_color(color: &str) -> Option<u32> {
    let hex = color.trim().trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }
    u32::from_str_radix(hex, 16).ok()
}

/// First and last column of lane `lane` out of `lanes`, relative to the day
pub fn lane_columns(lane: usize, lanes: usize, columns: u16) -> (u16, u16) {
    let c = columns as usize;
    let first = lane * c / lanes;
    let last = ((lane + 1) * c / lanes).max(first + 1) - 1;
    (first as u16, last as u16)
}

/// Excel weekly planner renderer
#[derive(Clone, Debug)]
pub struct ExcelRenderer {
    /// Worksheet name
    pub sheet_name: String,
    /// Columns per day even when a day needs fewer lanes
    pub min_day_columns: u16,
    /// Width of the time column
    pub time_column_width: f64,
    /// Total width of a day with width factor 1, spread over its columns
    pub day_column_width: f64,
    /// Height of a slot row
    pub row_height: f64,
    /// Fill for sessions without a usable colour
    pub default_fill: u32,
}

impl Default for ExcelRenderer {
    fn default() -> Self {
        Self {
            sheet_name: "Wochenplan".into(),
            min_day_columns: 2,
            time_column_width: 8.0,
            day_column_width: 28.0,
            row_height: 18.0,
            default_fill: 0xD9D9D9,
        }
    }
}

struct PlannerFormats {
    title: Format,
    header: Format,
    time: Format,
    slot: Format,
}

/// Resolved column block of one day
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct DayColumns {
    first: u16,
    count: u16,
}

impl ExcelRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the worksheet name
    pub fn sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = name.into();
        self
    }

    /// Set the minimum number of columns per day
    pub fn min_day_columns(mut self, columns: u16) -> Self {
        self.min_day_columns = columns.max(1);
        self
    }

    /// Set the slot row height
    pub fn row_height(mut self, height: f64) -> Self {
        self.row_height = height;
        self
    }

    /// Generate Excel workbook bytes
    pub fn render_to_bytes(&self, plan: &WeekPlan, layout: &WeekLayout) -> Result<Vec<u8>, RenderError> {
        plan.validate()?;

        let mut workbook = Workbook::new();
        let formats = self.create_formats();
        let sheet = workbook.add_worksheet();
        sheet.set_name(&self.sheet_name).map_err(xlsx_error)?;
        sheet.set_landscape();

        let columns = self.day_columns(plan, layout);
        let last_col = columns.last().map(|c| c.first + c.count - 1).unwrap_or(0);
        let slots = self.slot_count(plan);

        self.write_frame(sheet, plan, &columns, last_col, slots, &formats)?;

        let mut occupied: HashMap<(u32, u16), SessionId> = HashMap::new();
        for day in &layout.days {
            let block = columns.get(day.slot).copied().ok_or_else(|| {
                RenderError::InvalidData(format!(
                    "layout slot {} for {} is outside the {}-day week",
                    day.slot,
                    day.day,
                    plan.week.len()
                ))
            })?;
            self.write_day(sheet, plan, day, block, &mut occupied)?;
        }

        sheet.set_freeze_panes(2, 1).map_err(xlsx_error)?;

        debug!(sessions = layout.placed_count(), slots, columns = last_col + 1, "rendered planner");

        let buffer = workbook
            .save_to_buffer()
            .map_err(|e| RenderError::Format(format!("Failed to create Excel: {e}")))?;

        Ok(buffer)
    }

    /// Create reusable formats
    fn create_formats(&self) -> PlannerFormats {
        let title = Format::new().set_bold().set_font_size(16);

        let header = Format::new()
            .set_bold()
            .set_align(FormatAlign::Center)
            .set_background_color(0x4472C4)
            .set_font_color(0xFFFFFF)
            .set_border(FormatBorder::Thin);

        let time = Format::new()
            .set_align(FormatAlign::Right)
            .set_align(FormatAlign::Top)
            .set_border(FormatBorder::Thin);

        let slot = Format::new().set_border(FormatBorder::Hair);

        PlannerFormats {
            title,
            header,
            time,
            slot,
        }
    }

    /// Column block of every configured day
    fn day_columns(&self, plan: &WeekPlan, layout: &WeekLayout) -> Vec<DayColumns> {
        let mut next = 1u16;
        (0..plan.week.len())
            .map(|slot| {
                let lanes = layout
                    .days
                    .iter()
                    .find(|d| d.slot == slot)
                    .map(|d| d.lane_count)
                    .unwrap_or(0);
                let count = (lanes as u16).max(self.min_day_columns).max(1);
                let block = DayColumns { first: next, count };
                next += count;
                block
            })
            .collect()
    }

    /// Pairs of sessions that would land in the same planner cell
    ///
    /// Sessions shorter than a slot can share a row with their lane
    /// neighbour. Sessions outside the grid are not considered.
    pub fn shared_cells(&self, plan: &WeekPlan, layout: &WeekLayout) -> Vec<(SessionId, SessionId)> {
        let mut shared = Vec::new();
        for day in &layout.days {
            // lane -> (last session, its last row); sessions arrive in start order
            let mut lane_end: HashMap<usize, (SessionId, u32)> = HashMap::new();
            for placed in &day.sessions {
                let Some(session) = plan.sessions.get(placed.id) else {
                    continue;
                };
                if session.start < plan.grid_start || session.end > plan.grid_end {
                    continue;
                }
                let (first, last) = self.slot_rows(plan, session.start, session.end);
                if let Some(&(other, other_last)) = lane_end.get(&placed.lane) {
                    if first <= other_last {
                        shared.push((other, placed.id));
                    }
                }
                lane_end.insert(placed.lane, (placed.id, last));
            }
        }
        shared
    }

    fn slot_count(&self, plan: &WeekPlan) -> u32 {
        let minutes = (plan.grid_end - plan.grid_start).num_minutes().max(0) as u32;
        minutes.div_ceil(plan.slot_minutes)
    }

    /// Rows covered by a session, relative to the first slot row
    fn slot_rows(&self, plan: &WeekPlan, start: NaiveTime, end: NaiveTime) -> (u32, u32) {
        let slot = i64::from(plan.slot_minutes);
        let first = (start - plan.grid_start).num_minutes() / slot;
        let last = ((end - plan.grid_start).num_minutes() / slot - 1).max(first);
        (first as u32, last as u32)
    }

    /// Title, headers, time column and empty slot cells
    fn write_frame(
        &self,
        sheet: &mut Worksheet,
        plan: &WeekPlan,
        columns: &[DayColumns],
        last_col: u16,
        slots: u32,
        formats: &PlannerFormats,
    ) -> Result<(), RenderError> {
        sheet
            .merge_range(0, 0, 0, last_col, &plan.display_title(), &formats.title)
            .map_err(xlsx_error)?;
        sheet.set_row_height(0, 24).ok();

        sheet.set_column_width(0, self.time_column_width).ok();
        sheet
            .write_string_with_format(1, 0, "Zeit", &formats.header)
            .map_err(xlsx_error)?;

        for (slot, (day, block)) in plan.week.days.iter().zip(columns).enumerate() {
            let width = self.day_column_width * plan.week.day_width(slot) / block.count as f64;
            for col in block.first..block.first + block.count {
                sheet.set_column_width(col, width).ok();
            }

            let label = format!("{} {}", day, plan.date_of(*day).format("%d.%m."));
            if block.count > 1 {
                sheet
                    .merge_range(1, block.first, 1, block.first + block.count - 1, &label, &formats.header)
                    .map_err(xlsx_error)?;
            } else {
                sheet
                    .write_string_with_format(1, block.first, &label, &formats.header)
                    .map_err(xlsx_error)?;
            }
        }

        let mut time = plan.grid_start;
        for i in 0..slots {
            let row = 2 + i;
            sheet.set_row_height(row, self.row_height).ok();
            sheet
                .write_string_with_format(row, 0, time.format("%H:%M").to_string(), &formats.time)
                .map_err(xlsx_error)?;
            for col in 1..=last_col {
                sheet.write_blank(row, col, &formats.slot).map_err(xlsx_error)?;
            }
            time += chrono::Duration::minutes(i64::from(plan.slot_minutes));
        }
        Ok(())
    }

    /// Merged session cells of one day
    fn write_day(
        &self,
        sheet: &mut Worksheet,
        plan: &WeekPlan,
        day: &DayLayout,
        block: DayColumns,
        occupied: &mut HashMap<(u32, u16), SessionId>,
    ) -> Result<(), RenderError> {
        for placed in &day.sessions {
            let session = session_for(plan, placed.id)?;
            if session.start < plan.grid_start || session.end > plan.grid_end {
                return Err(RenderError::InvalidData(format!(
                    "session {} ({} {}) lies outside the planner grid {}-{}",
                    placed.id,
                    session.day,
                    session.time_range(),
                    plan.grid_start.format("%H:%M"),
                    plan.grid_end.format("%H:%M")
                )));
            }

            let (first_row, last_row) = self.slot_rows(plan, session.start, session.end);
            let (first_col, last_col) = lane_columns(placed.lane, day.lane_count, block.count);
            let (first_row, last_row) = (first_row + 2, last_row + 2);
            let (first_col, last_col) = (block.first + first_col, block.first + last_col);

            for row in first_row..=last_row {
                for col in first_col..=last_col {
                    if let Some(other) = occupied.insert((row, col), placed.id) {
                        return Err(RenderError::InvalidData(format!(
                            "sessions {other} and {} share a planner cell at {}-minute slots; \
                             lower slot_minutes to separate them",
                            placed.id, plan.slot_minutes
                        )));
                    }
                }
            }

            let fill = match plan.session_color(session).and_then(parse_hex_color) {
                Some(rgb) => rgb,
                None => {
                    warn!(
                        session = placed.id,
                        color = ?plan.session_color(session),
                        "no hex colour for session, using default fill"
                    );
                    self.default_fill
                }
            };
            let size = plan.font_sizes.select(session.duration())?;
            let format = Format::new()
                .set_text_wrap()
                .set_align(FormatAlign::Top)
                .set_font_size(size)
                .set_background_color(fill)
                .set_border(FormatBorder::Thick);

            let text = [
                session.tutor.as_str(),
                session.topic.as_str(),
                session.room.as_deref().unwrap_or_default(),
            ]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n");

            if first_row == last_row && first_col == last_col {
                sheet
                    .write_string_with_format(first_row, first_col, &text, &format)
                    .map_err(xlsx_error)?;
            } else {
                sheet
                    .merge_range(first_row, first_col, last_row, last_col, &text, &format)
                    .map_err(xlsx_error)?;
            }
        }
        Ok(())
    }
}

impl Renderer for ExcelRenderer {
    type Output = Vec<u8>;

    fn render(&self, plan: &WeekPlan, layout: &WeekLayout) -> Result<Vec<u8>, RenderError> {
        self.render_to_bytes(plan, layout)
    }
}
