use std::fmt;

use crate::types::TopologyView;

/// Human-readable cluster status, one line per member.
pub struct StatusReport<'a>(pub &'a TopologyView);

impl fmt::Display for StatusReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let view = self.0;
        let rule = "-".repeat(41);
        let count = view.member_count();

        writeln!(f, "MySQL InnoDB Cluster Status")?;
        writeln!(f, "===========================")?;
        writeln!(f, "Cluster Name:      {}", view.cluster_name)?;
        writeln!(f, "Cluster Status:    {}", view.status_text)?;
        writeln!(f, "Status Code:       {}", view.status)?;
        writeln!(f, "{rule}")?;
        writeln!(f, "Primary Instance:  {}", view.primary)?;
        writeln!(f, "{rule}")?;
        writeln!(
            f,
            "HA Topology:       {count} instance{}",
            if count == 1 { "" } else { "s" }
        )?;
        for m in &view.members {
            writeln!(f, "- {} ({}) - Status: {}", m.address, m.mode, m.status)?;
        }
        Ok(())
    }
}

pub fn render_status(view: &TopologyView) -> String {
    StatusReport(view).to_string()
}
