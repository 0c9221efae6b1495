use std::sync::Arc;

use anyhow::Context;
use cairn_core::enums::HookType;
use cairn_hooks::HookHandler;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::HookCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `cairn hook <name>`, as invoked from a `.git/hooks` script.
///
/// Every hook prints its [`HookResult`](cairn_hooks::HookResult). Only a
/// failed pre-push exits non-zero, which makes git abort the push.
pub async fn handle(action: &HookCommands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let (hook_type, previous_commit) = hook_invocation(action);

    let event = cairn_hooks::git::event_from_repo(hook_type, &ctx.project_root, previous_commit)
        .with_context(|| format!("hook {hook_type}: failed to read repository state"))?;

    let mut handler = HookHandler::new(
        Arc::clone(&ctx.db),
        ctx.project_id(),
        ctx.config.hooks.clone(),
    );
    if let Some(tools) = ctx.tools()? {
        handler = handler.with_tools(tools);
    }

    let result = handler.handle(&event).await;
    output(&result, flags.format)?;

    if hook_type == HookType::PrePush && !result.success {
        anyhow::bail!("hook pre-push: push blocked: {}", result.message);
    }
    Ok(())
}

/// Map git's hook arguments onto a hook type and the previous HEAD.
fn hook_invocation(action: &HookCommands) -> (HookType, Option<String>) {
    match action {
        HookCommands::PreCommit => (HookType::PreCommit, None),
        HookCommands::PostMerge(_) => (HookType::PostMerge, None),
        HookCommands::PrePush(_) => (HookType::PrePush, None),
        HookCommands::PostCheckout(args) => {
            // A file checkout keeps HEAD, so report it as unchanged.
            let previous = if args.branch_checkout.as_deref() == Some("0") {
                args.new_head.clone()
            } else {
                args.previous_head.clone()
            };
            (HookType::PostCheckout, previous)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::subcommands::{PostCheckoutArgs, PostMergeArgs};
    use pretty_assertions::assert_eq;

    fn checkout(previous: &str, new: &str, flag: &str) -> HookCommands {
        HookCommands::PostCheckout(PostCheckoutArgs {
            previous_head: Some(previous.into()),
            new_head: Some(new.into()),
            branch_checkout: Some(flag.into()),
        })
    }

    #[test]
    fn branch_checkout_passes_previous_head() {
        assert_eq!(
            hook_invocation(&checkout("aaa", "bbb", "1")),
            (HookType::PostCheckout, Some("aaa".to_string()))
        );
    }

    #[test]
    fn file_checkout_reports_unchanged_head() {
        assert_eq!(
            hook_invocation(&checkout("aaa", "aaa", "0")).1,
            Some("aaa".to_string())
        );
        assert_eq!(
            hook_invocation(&checkout("aaa", "bbb", "0")).1,
            Some("bbb".to_string())
        );
    }

    #[test]
    fn merge_uses_orig_head_fallback() {
        let (hook, previous) = hook_invocation(&HookCommands::PostMerge(PostMergeArgs { squash: None }));
        assert_eq!(hook, HookType::PostMerge);
        assert_eq!(previous, None);
    }
}
