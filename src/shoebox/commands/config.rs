use crate::commands::{CmdMessage, CmdResult, ShoeboxPaths};
use crate::config::ShoeboxConfig;
use crate::error::Result;

#[derive(Debug, Clone)]
pub enum ConfigAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
}

/// Bad keys and values come back as error messages, not `Err`: the config
/// file is left untouched and there is nothing to unwind.
pub fn run(paths: &ShoeboxPaths, action: ConfigAction) -> Result<CmdResult> {
    let mut config = ShoeboxConfig::load(&paths.data_dir)?;
    let mut result = CmdResult::default();

    match action {
        ConfigAction::ShowAll => Ok(result.with_config(config)),
        ConfigAction::ShowKey(key) => {
            match config.get(&key) {
                Ok(value) => result.add_message(CmdMessage::info(value)),
                Err(e) => result.add_message(CmdMessage::error(e.to_string())),
            }
            Ok(result)
        }
        ConfigAction::Set(key, value) => {
            if let Err(e) = config.set(&key, &value) {
                result.add_message(CmdMessage::error(e.to_string()));
                return Ok(result);
            }
            config.save(&paths.data_dir)?;
            let shown = config.get(&key).unwrap_or(value);
            result.add_message(CmdMessage::success(format!("{} set to {}", key, shown)));
            Ok(result.with_config(config))
        }
    }
}
