use crate::app::command_support::{open_core, parse_bool};
use crate::config::StatePaths;
use crate::domain::ProfileDraft;
use crate::store;

pub fn cmd_configure(paths: &StatePaths, args: &[String]) -> Result<String, String> {
    if args.len() != 3 {
        return Err(
            "usage: configure <profile_name> <autonomy_level 1-5> <confirm_critical true|false>"
                .to_string(),
        );
    }
    let autonomy_level = args[1]
        .parse::<u8>()
        .map_err(|_| format!("invalid autonomy level `{}`", args[1]))?;
    let draft = ProfileDraft {
        profile_name: args[0].clone(),
        autonomy_level,
        require_confirmation_for_critical: parse_bool(&args[2])?,
    };
    let config = draft.build()?;

    let core = open_core(paths)?;
    let summary = format!(
        "configuration applied\nprofile={}\nautonomy={}\nconfirm_critical={}",
        config.profile_name, config.autonomy_level, config.require_confirmation_for_critical
    );
    store::lock(core.store()).set_config(config);
    Ok(summary)
}
