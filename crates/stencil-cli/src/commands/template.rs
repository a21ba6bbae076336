//! Implementation of the `stencil template` command.

use stencil_core::application::TemplateInfo;

use crate::{
    cli::{OutputFormat, TemplateArgs},
    commands::template_service,
    error::CliResult,
    output::OutputManager,
};

pub fn execute(args: TemplateArgs, output: OutputManager) -> CliResult<()> {
    let templates = template_service(args.manifest.as_deref())?.list_templates()?;

    if output.format() == OutputFormat::Json {
        // JSON must stay parseable even in quiet mode, so it bypasses print().
        output.json(&templates)?;
        return Ok(());
    }

    output.header("Available Templates:")?;
    for template in &templates {
        show_template(template, &output)?;
    }
    Ok(())
}

fn show_template(template: &TemplateInfo, output: &OutputManager) -> CliResult<()> {
    output.print(&format!("  {}", template.id))?;
    output.print(&format!("    Repository:  {}", template.repository_url))?;
    output.print(&format!("    Branch:      {}", template.branch))?;
    output.print(&format!("    Rename:      {} steps", template.rename_steps))?;
    output.print(&format!(
        "    Security:    {} paths removed, {} files edited",
        template.security_deletions, template.security_edits
    ))?;
    for advisory in &template.advisories {
        output.print(&format!("    Advisory:    {advisory}"))?;
    }
    Ok(())
}
