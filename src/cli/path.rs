use mainline::{ObjectId, RequestContext};
use tracing::instrument;

use super::{Workspace, instances::label, terminal::Colorize};

#[derive(Debug, clap::Parser)]
pub struct Path {
    /// The business id
    business: i64,

    /// The object type of the target instance
    object: ObjectId,

    /// The id of the target instance
    id: i64,

    /// Read display names from the source documents
    #[arg(long)]
    with_detail: bool,
}

impl Path {
    #[instrument(skip(workspace, ctx))]
    pub fn run(&self, workspace: &Workspace, ctx: &RequestContext) -> anyhow::Result<()> {
        let Some(root) = workspace.service().search_mainline_instance_topo(
            ctx,
            self.business,
            self.with_detail,
        )?
        else {
            anyhow::bail!("business {} has no topology", self.business);
        };

        let path = root.find_path(&self.object, self.id);
        if path.is_empty() {
            anyhow::bail!(
                "{}:{} is not in the topology of business {}",
                self.object,
                self.id,
                self.business
            );
        }

        for (depth, node) in path.iter().rev().enumerate() {
            println!("{}{}", "  ".repeat(depth), label(node, workspace.config()));
        }
        println!(
            "{}",
            format!("\n✅ {} levels from business to target", path.len()).success()
        );
        Ok(())
    }
}
