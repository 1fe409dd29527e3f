use mainline::{Config, RequestContext, TopoNode};
use tracing::instrument;

use super::{Output, Workspace, terminal::Colorize};

#[derive(Debug, clap::Parser)]
pub struct Instances {
    /// The business id
    business: i64,

    /// Attach the source document to every node
    #[arg(long)]
    with_detail: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t)]
    output: Output,
}

impl Instances {
    #[instrument(skip(workspace, ctx))]
    pub fn run(&self, workspace: &Workspace, ctx: &RequestContext) -> anyhow::Result<()> {
        let root = workspace.service().search_mainline_instance_topo(
            ctx,
            self.business,
            self.with_detail,
        )?;

        let Some(root) = root else {
            eprintln!(
                "{}",
                format!("Business {} has no topology", self.business).warning()
            );
            return Ok(());
        };

        match self.output {
            Output::Json => println!("{}", serde_json::to_string_pretty(&root)?),
            Output::Pretty => {
                print_node(&root, workspace.config(), "", true, true);
                let summary = format!(
                    "\n{} instances, {} levels",
                    root.iter().count(),
                    root.depth() + 1
                );
                println!("{}", summary.dim());
            }
        }
        Ok(())
    }
}

/// A one-line label: the display name when detail is present, the key
/// otherwise.
pub fn label(node: &TopoNode, config: &Config) -> String {
    let key = node.key().to_string();
    let name = node.name(config);
    if name == key {
        key.info()
    } else {
        format!("{} {}", name.info(), format!("({key})").dim())
    }
}

fn print_node(node: &TopoNode, config: &Config, prefix: &str, last: bool, root: bool) {
    if root {
        println!("{}", label(node, config));
    } else {
        let branch = if last { "└── " } else { "├── " };
        println!("{prefix}{}{}", branch.dim(), label(node, config));
    }

    let child_prefix = if root {
        String::new()
    } else if last {
        format!("{prefix}    ")
    } else {
        format!("{prefix}│   ")
    };
    let count = node.children.len();
    for (i, child) in node.children.iter().enumerate() {
        print_node(child, config, &child_prefix, i + 1 == count, false);
    }
}
