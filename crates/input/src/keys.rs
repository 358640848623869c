use sceneforge_common::ObjectKind;

use crate::Action;

/// Map a key name (as reported by the browser's `KeyboardEvent.key`) to an
/// action. `ctrl` is true when Control or Meta is held.
pub fn map_key(key: &str, ctrl: bool) -> Action {
    let action = match (key, ctrl) {
        ("Delete" | "Backspace", false) => Action::DeleteSelected,
        ("Escape", _) => Action::Deselect,
        ("z" | "Z", true) => Action::Undo,
        ("y" | "Y", true) => Action::Redo,
        ("1", false) => Action::AddObject(ObjectKind::Cube),
        ("2", false) => Action::AddObject(ObjectKind::Sphere),
        ("3", false) => Action::AddObject(ObjectKind::Light),
        _ => Action::Noop,
    };
    if action != Action::Noop {
        tracing::trace!(key, ctrl, ?action, "key mapped");
    }
    action
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delete_keys_delete_selection() {
        assert_eq!(map_key("Delete", false), Action::DeleteSelected);
        assert_eq!(map_key("Backspace", false), Action::DeleteSelected);
    }

    #[test]
    fn undo_redo_need_ctrl() {
        assert_eq!(map_key("z", true), Action::Undo);
        assert_eq!(map_key("Y", true), Action::Redo);
        assert_eq!(map_key("z", false), Action::Noop);
    }

    #[test]
    fn number_keys_add_objects() {
        assert_eq!(map_key("1", false), Action::AddObject(ObjectKind::Cube));
        assert_eq!(map_key("2", false), Action::AddObject(ObjectKind::Sphere));
        assert_eq!(map_key("3", false), Action::AddObject(ObjectKind::Light));
        assert_eq!(map_key("4", false), Action::Noop);
    }

    #[test]
    fn escape_deselects_even_with_ctrl() {
        assert_eq!(map_key("Escape", true), Action::Deselect);
    }
}
