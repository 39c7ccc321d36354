//! Read-only command handlers.

use super::{CliOutput, HandlerContext};
use attest_core::{Address, AttestError, AttestResult, AttributeTypeId};

/// `attest types`
pub fn handle_types(ctx: &HandlerContext) -> AttestResult<CliOutput> {
    let registry = ctx.load_registry()?;
    let mut output = CliOutput::new();
    output.println(format!("{} attribute types", registry.count_attribute_types()));
    for (index, attribute_type) in registry.catalog().iter().enumerate() {
        output.println(format!("[{index}] {} {}", attribute_type.id, attribute_type.name));
    }
    Ok(output)
}

/// `attest type-id <index>`
pub fn handle_type_id(ctx: &HandlerContext, index: i64) -> AttestResult<CliOutput> {
    let registry = ctx.load_registry()?;
    let id = registry.attribute_type_id_signed(index)?;
    let mut output = CliOutput::new();
    output.println(id.to_string());
    Ok(output)
}

/// `attest has <subject> <type>`
pub fn handle_has(
    ctx: &HandlerContext,
    subject: Address,
    attribute_type: AttributeTypeId,
) -> AttestResult<CliOutput> {
    let registry = ctx.load_registry()?;
    let mut output = CliOutput::new();
    output.println(registry.has_attribute(subject, attribute_type).to_string());
    Ok(output)
}

/// `attest value <subject> <type>`
pub fn handle_value(
    ctx: &HandlerContext,
    subject: Address,
    attribute_type: AttributeTypeId,
) -> AttestResult<CliOutput> {
    let registry = ctx.load_registry()?;
    let value = registry.attribute_value(subject, attribute_type)?;
    let mut output = CliOutput::new();
    output.println(value.to_string());
    Ok(output)
}

/// `attest totals`
pub fn handle_totals(ctx: &HandlerContext) -> AttestResult<CliOutput> {
    let registry = ctx.load_registry()?;
    let workflow = ctx.config().hat_workflow()?;
    let totals = workflow.total_hats(&registry);
    let mut output = CliOutput::new();
    output.println(format!("whitehats {}", totals.whitehats));
    output.println(format!("blackhats {}", totals.blackhats));
    Ok(output)
}

/// `attest show <subject>`
pub fn handle_show(ctx: &HandlerContext, subject: Address) -> AttestResult<CliOutput> {
    let registry = ctx.load_registry()?;
    let workflow = ctx.config().hat_workflow()?;
    let mut output = CliOutput::new();
    output.println(format!("hat {}", workflow.state_of(&registry, subject).as_str()));
    for (attribute_type, value) in registry.attributes_of(subject) {
        let name = registry.catalog().name_of(attribute_type).unwrap_or("?");
        output.println(format!("{attribute_type} {name} {value}"));
    }
    Ok(output)
}

/// `attest facts [--since n]`
pub fn handle_facts(ctx: &HandlerContext, since: u64) -> AttestResult<CliOutput> {
    let registry = ctx.load_registry()?;
    let mut output = CliOutput::new();
    for fact in registry.facts_since(since) {
        let line = serde_json::to_string(fact).map_err(AttestError::from)?;
        output.println(line);
    }
    Ok(output)
}
