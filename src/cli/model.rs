use mainline::{Config, ModelSpineNode, RequestContext, Spine};
use tracing::instrument;

use super::{Output, Workspace, terminal::Colorize};

#[derive(Debug, clap::Parser)]
pub struct Model {
    /// Attach each level's model description
    #[arg(long)]
    with_detail: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t)]
    output: Output,
}

impl Model {
    #[instrument(skip(workspace, ctx))]
    pub fn run(&self, workspace: &Workspace, ctx: &RequestContext) -> anyhow::Result<()> {
        let model = workspace
            .service()
            .search_mainline_model_topo(ctx, self.with_detail)?;

        match self.output {
            Output::Json => println!("{}", serde_json::to_string_pretty(&model)?),
            Output::Pretty => {
                print_level(&model, workspace.config(), 0);

                let spine = Spine::resolve(&model);
                if let Err(e) = spine.validate(workspace.config()) {
                    eprintln!("\n{}", format!("⚠️  {e}").warning());
                }
            }
        }
        Ok(())
    }
}

fn print_level(node: &ModelSpineNode, config: &Config, depth: usize) {
    let indent = "  ".repeat(depth);
    match node
        .detail
        .get(&config.fields.model_name)
        .and_then(serde_json::Value::as_str)
    {
        Some(name) => println!(
            "{indent}{} {}",
            name.info(),
            format!("({})", node.object).dim()
        ),
        None => println!("{indent}{}", node.object.info()),
    }

    for child in &node.children {
        print_level(child, config, depth + 1);
    }
}
