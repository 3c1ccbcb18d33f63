//! UI commands for customizing a character

use std::str::FromStr;

use super::slot::{AttachmentKind, CycleDirection};

/// A discrete customization request coming from the UI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomizationCommand {
    /// Outfit button
    ChangeOutfit,
    /// Beard button
    ChangeBeard,
    /// Armor button
    ChangeArmor,
    /// Hair button
    ChangeHair,
    CycleOutfit(CycleDirection),
    CycleAttachment(AttachmentKind, CycleDirection),
}

/// What a command resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandTarget {
    Outfit(CycleDirection),
    Attachment(AttachmentKind, CycleDirection),
}

impl CustomizationCommand {
    /// Map the command onto the outfit switcher or an attachment slot.
    /// The button commands always cycle forward.
    pub fn target(self) -> CommandTarget {
        match self {
            Self::ChangeOutfit => CommandTarget::Outfit(CycleDirection::Next),
            Self::ChangeBeard => CommandTarget::Attachment(AttachmentKind::Beard, CycleDirection::Next),
            Self::ChangeArmor => CommandTarget::Attachment(AttachmentKind::Armor, CycleDirection::Next),
            Self::ChangeHair => CommandTarget::Attachment(AttachmentKind::Hair, CycleDirection::Next),
            Self::CycleOutfit(direction) => CommandTarget::Outfit(direction),
            Self::CycleAttachment(kind, direction) => CommandTarget::Attachment(kind, direction),
        }
    }
}

impl FromStr for CustomizationCommand {
    type Err = String;

    /// Parse `outfit`, `beard`, `armor` or `hair`, optionally suffixed with
    /// `-next` or `-prev` (e.g. `hair-prev`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        let (name, direction) = match s.rsplit_once('-') {
            Some((name, "next")) => (name, Some(CycleDirection::Next)),
            Some((name, "prev")) => (name, Some(CycleDirection::Prev)),
            _ => (s.as_str(), None),
        };

        if name == "outfit" {
            return Ok(match direction {
                Some(direction) => Self::CycleOutfit(direction),
                None => Self::ChangeOutfit,
            });
        }

        let kind = name
            .parse::<AttachmentKind>()
            .map_err(|_| format!("unknown command: {}", s))?;

        Ok(match (kind, direction) {
            (kind, Some(direction)) => Self::CycleAttachment(kind, direction),
            (AttachmentKind::Beard, None) => Self::ChangeBeard,
            (AttachmentKind::Armor, None) => Self::ChangeArmor,
            (AttachmentKind::Hair, None) => Self::ChangeHair,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buttons_cycle_forward() {
        assert_eq!(
            CustomizationCommand::ChangeOutfit.target(),
            CommandTarget::Outfit(CycleDirection::Next)
        );
        assert_eq!(
            CustomizationCommand::ChangeBeard.target(),
            CommandTarget::Attachment(AttachmentKind::Beard, CycleDirection::Next)
        );
        assert_eq!(
            CustomizationCommand::ChangeArmor.target(),
            CommandTarget::Attachment(AttachmentKind::Armor, CycleDirection::Next)
        );
        assert_eq!(
            CustomizationCommand::ChangeHair.target(),
            CommandTarget::Attachment(AttachmentKind::Hair, CycleDirection::Next)
        );
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!("outfit".parse::<CustomizationCommand>(), Ok(CustomizationCommand::ChangeOutfit));
        assert_eq!("Hair".parse::<CustomizationCommand>(), Ok(CustomizationCommand::ChangeHair));
        assert_eq!(
            "outfit-prev".parse::<CustomizationCommand>(),
            Ok(CustomizationCommand::CycleOutfit(CycleDirection::Prev))
        );
        assert_eq!(
            "beard-next".parse::<CustomizationCommand>(),
            Ok(CustomizationCommand::CycleAttachment(
                AttachmentKind::Beard,
                CycleDirection::Next
            ))
        );
        assert!("cape".parse::<CustomizationCommand>().is_err());
        assert!("hair-sideways".parse::<CustomizationCommand>().is_err());
    }
}
