use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::OrgChart;

pub fn render_json(chart: &OrgChart) -> ApplicationResult<String> {
    serde_json::to_string_pretty(&chart.to_hierarchy()).map_err(|e| ApplicationError::Render {
        message: e.to_string(),
    })
}
