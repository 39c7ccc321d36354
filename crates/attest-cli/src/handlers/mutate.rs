//! State-changing command handlers.

use super::{CliOutput, HandlerContext};
use crate::cli::Hat;
use attest_core::{Address, AttestError, AttestResult, AttributeTypeId, AttributeValue};
use attest_registry::{AuthorityPolicy, IssueReceipt, IssueRequest, RevokeRequest};
use tracing::info;

/// `attest join <hat> --as <caller>`
pub fn handle_join(ctx: &HandlerContext, hat: Hat, caller: Address) -> AttestResult<CliOutput> {
    let workflow = ctx.config().hat_workflow()?;
    let _lock = ctx.lock_state()?;
    let mut registry = ctx.load_registry()?;

    let receipt = match hat {
        Hat::Whitehats => workflow.join_whitehats(&mut registry, caller)?,
        Hat::Blackhats => workflow.join_blackhats(&mut registry, caller)?,
    };
    ctx.save_registry(&registry)?;

    info!(caller = %caller, hat = ?hat, sequence = receipt.sequence, "joined");
    let mut output = describe_issue(&receipt);
    let totals = workflow.total_hats(&registry);
    output.println(format!(
        "totals: whitehats {} blackhats {}",
        totals.whitehats, totals.blackhats
    ));
    Ok(output)
}

/// `attest issue <subject> <type> <value> --as <caller>`
pub fn handle_issue(
    ctx: &HandlerContext,
    subject: Address,
    attribute_type: AttributeTypeId,
    value: AttributeValue,
    caller: Address,
) -> AttestResult<CliOutput> {
    let policy = authority(ctx)?;
    let _lock = ctx.lock_state()?;
    let mut registry = ctx.load_registry()?;
    let receipt = registry.issue(
        &IssueRequest::new(caller, subject, attribute_type, value),
        &policy,
    )?;
    ctx.save_registry(&registry)?;

    info!(
        issuer = %policy.issuer(),
        subject = %subject,
        attribute_type = %attribute_type,
        sequence = receipt.sequence,
        "issued"
    );
    Ok(describe_issue(&receipt))
}

/// `attest revoke <subject> <type> --as <caller>`
pub fn handle_revoke(
    ctx: &HandlerContext,
    subject: Address,
    attribute_type: AttributeTypeId,
    caller: Address,
) -> AttestResult<CliOutput> {
    let policy = authority(ctx)?;
    let _lock = ctx.lock_state()?;
    let mut registry = ctx.load_registry()?;
    let receipt = registry.revoke(&RevokeRequest::new(caller, subject, attribute_type), &policy)?;
    ctx.save_registry(&registry)?;
    info!(
        issuer = %policy.issuer(),
        subject = %subject,
        attribute_type = %attribute_type,
        sequence = receipt.sequence,
        "revoked"
    );

    let mut output = CliOutput::new();
    output.println(format!(
        "#{} revoked {} from {} (value {})",
        receipt.sequence, receipt.attribute_type, receipt.subject, receipt.value
    ));
    Ok(output)
}

fn authority(ctx: &HandlerContext) -> AttestResult<AuthorityPolicy> {
    ctx.config()
        .authority_policy()
        .ok_or_else(|| AttestError::invalid("no issuer configured (set `issuer` or ATTEST_ISSUER)"))
}

fn describe_issue(receipt: &IssueReceipt) -> CliOutput {
    let mut output = CliOutput::new();
    for (attribute_type, value) in &receipt.revoked {
        output.println(format!(
            "revoked {attribute_type} from {} (value {value})",
            receipt.subject
        ));
    }
    output.println(format!(
        "#{} issued {} to {} (value {})",
        receipt.sequence, receipt.attribute_type, receipt.subject, receipt.value
    ));
    output
}
