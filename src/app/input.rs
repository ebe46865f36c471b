use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::engine::{Engine, Lifecycle};
use crate::model::{Mode, SortKey};

use super::App;

/// Result of handling a key: Quit the app, or key was consumed.
/// None means the key was not handled.
pub enum InputResult {
    Quit,
    Consumed,
}

/// Handle a key event according to the current mode.
pub fn handle_key<E: Engine + Clone + 'static>(app: &mut App<E>, key_event: KeyEvent) -> Option<InputResult> {
    let KeyEvent { code, modifiers, .. } = key_event;

    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        return Some(InputResult::Quit);
    }
    if code == KeyCode::Char('q') {
        return Some(InputResult::Quit);
    }

    match app.view.mode {
        Mode::Table => handle_table(app, code),
        Mode::Help => handle_overlay(app, code, 'h', Mode::Help),
        Mode::Detail => handle_overlay(app, code, 'i', Mode::Detail),
    }
}

/// Overlays only react to their own toggle key.
fn handle_overlay<E: Engine + Clone + 'static>(
    app: &mut App<E>,
    code: KeyCode,
    toggle: char,
    mode: Mode,
) -> Option<InputResult> {
    if code == KeyCode::Char(toggle) {
        app.view.toggle_mode(mode);
        return Some(InputResult::Consumed);
    }
    None
}

fn handle_table<E: Engine + Clone + 'static>(app: &mut App<E>, code: KeyCode) -> Option<InputResult> {
    let rows = app.rows.len();
    let height = app.view.table_height();

    match code {
        KeyCode::Up => {
            app.view.cursor.move_up(rows, height);
            app.status_message = None;
        }
        KeyCode::Down => {
            app.view.cursor.move_down(rows, height);
            app.status_message = None;
        }
        KeyCode::Char(' ') => {
            let id = app.cursor_container_id()?.to_string();
            if let Some(c) = app.snapshot.get_mut(&id) {
                c.selected = !c.selected;
            }
            app.view.cursor.move_down(rows, height);
        }
        KeyCode::Char('u') => app.snapshot.clear_selection(),
        KeyCode::Char('a') => {
            for id in app.target_ids() {
                if let Some(c) = app.snapshot.get_mut(&id) {
                    c.expanded = !c.expanded;
                }
            }
        }
        KeyCode::Char('A') => app.view.show_all_processes = !app.view.show_all_processes,
        KeyCode::Char('o') => app.view.sort_reversed = !app.view.sort_reversed,
        KeyCode::Char('h') => app.view.toggle_mode(Mode::Help),
        KeyCode::Char('i') => app.view.toggle_mode(Mode::Detail),
        KeyCode::Char(c @ '1'..='8') => app.view.sort_key = SortKey::from_digit(c)?,
        KeyCode::Char(c) => {
            let action = lifecycle_for(c)?;
            dispatch(app, action);
        }
        _ => return None,
    }
    Some(InputResult::Consumed)
}

fn lifecycle_for(c: char) -> Option<Lifecycle> {
    match c {
        's' => Some(Lifecycle::Start),
        'S' => Some(Lifecycle::Stop),
        'p' => Some(Lifecycle::Pause),
        'P' => Some(Lifecycle::Unpause),
        'k' => Some(Lifecycle::Kill),
        'r' => Some(Lifecycle::Remove),
        _ => None,
    }
}

fn dispatch<E: Engine + Clone + 'static>(app: &mut App<E>, action: Lifecycle) {
    let targets = app.targets();
    if targets.is_empty() {
        return;
    }
    app.dispatcher.apply(action, &targets);
    let plural = if targets.len() == 1 { "" } else { "s" };
    app.status_message = Some(format!("{} sent to {} container{}", action, targets.len(), plural));
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::app::testing::harness;
    use crate::cursor::Cursor;
    use crate::engine::fake::{container, process, FakeEngine};

    fn press(app: &mut App<FakeEngine>, code: KeyCode) -> Option<InputResult> {
        let result = handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
        app.layout();
        result
    }

    fn ch(app: &mut App<FakeEngine>, c: char) -> Option<InputResult> {
        press(app, KeyCode::Char(c))
    }

    fn names(app: &App<FakeEngine>) -> Vec<String> {
        app.rows
            .iter()
            .filter(|r| r.is_container())
            .map(|r| app.snapshot.get(&r.container_id).unwrap().name.clone())
            .collect()
    }

    fn three_containers() -> FakeEngine {
        let engine = FakeEngine::default();
        engine.set_containers(vec![
            container("c1", "web"),
            container("c2", "db"),
            container("c3", "cache"),
        ]);
        engine.set_processes("c1", vec![process("11", "30.0", "5.0"), process("12", "2.0", "1.0")]);
        engine.set_processes("c2", vec![process("21", "1.0", "40.0")]);
        engine.set_processes("c3", vec![process("31", "5.0", "2.0")]);
        engine
    }

    #[test]
    fn down_past_window_scrolls_one_row() {
        let engine = FakeEngine::default();
        engine.set_containers((0..10).map(|i| container(&format!("c{i}"), &format!("n{i}"))).collect());
        let mut h = harness(engine);
        // 8 rows of terminal leave 5 for the table.
        h.app.resize(80, 8);
        h.app.view.cursor = Cursor { active: 4, offset: 0 };
        h.app.layout();

        press(&mut h.app, KeyCode::Down);
        assert_eq!(h.app.view.cursor, Cursor { active: 5, offset: 1 });
    }

    #[test]
    fn up_at_top_is_a_no_op() {
        let mut h = harness(three_containers());
        press(&mut h.app, KeyCode::Up);
        assert_eq!(h.app.view.cursor, Cursor::default());
    }

    #[test]
    fn space_toggles_selection_and_advances() {
        let mut h = harness(three_containers());
        // Sorted by name: cache, db, web.
        ch(&mut h.app, ' ');
        ch(&mut h.app, ' ');
        assert_eq!(h.app.snapshot.selected_ids(), vec!["c2".to_string(), "c3".to_string()]);
        assert_eq!(h.app.view.cursor.active, 2);

        press(&mut h.app, KeyCode::Up);
        ch(&mut h.app, ' ');
        assert_eq!(h.app.snapshot.selected_ids(), vec!["c3".to_string()]);
    }

    #[test]
    fn unselect_all_clears_everything() {
        let mut h = harness(three_containers());
        ch(&mut h.app, ' ');
        ch(&mut h.app, ' ');
        ch(&mut h.app, 'u');
        assert!(h.app.snapshot.selected_ids().is_empty());
    }

    #[test]
    fn expand_applies_to_cursor_without_selection() {
        let mut h = harness(three_containers());
        ch(&mut h.app, 'a');
        assert!(h.app.snapshot.get("c3").unwrap().expanded);
        assert_eq!(h.app.rows.len(), 4);
        assert!(h.app.rows[1].is_process());

        ch(&mut h.app, 'a');
        assert!(!h.app.snapshot.get("c3").unwrap().expanded);
        assert_eq!(h.app.rows.len(), 3);
    }

    #[test]
    fn expand_applies_to_every_selected_container() {
        let mut h = harness(three_containers());
        h.app.snapshot.get_mut("c1").unwrap().selected = true;
        h.app.snapshot.get_mut("c2").unwrap().selected = true;
        ch(&mut h.app, 'a');
        assert!(h.app.snapshot.get("c1").unwrap().expanded);
        assert!(h.app.snapshot.get("c2").unwrap().expanded);
        assert!(!h.app.snapshot.get("c3").unwrap().expanded);
    }

    #[test]
    fn show_all_processes_overrides_expansion() {
        let mut h = harness(three_containers());
        ch(&mut h.app, 'A');
        assert_eq!(h.app.rows.len(), 7);
        ch(&mut h.app, 'A');
        assert_eq!(h.app.rows.len(), 3);
    }

    #[test]
    fn moving_down_enters_process_rows() {
        let mut h = harness(three_containers());
        ch(&mut h.app, 'a');
        press(&mut h.app, KeyCode::Down);
        assert!(h.app.rows[h.app.view.cursor.active].is_process());
    }

    #[test]
    fn digit_keys_change_sort_and_o_reverses() {
        let mut h = harness(three_containers());
        assert_eq!(names(&h.app), vec!["cache", "db", "web"]);

        ch(&mut h.app, '7');
        assert_eq!(h.app.view.sort_key, SortKey::Cpu);
        assert_eq!(names(&h.app), vec!["web", "cache", "db"]);

        ch(&mut h.app, '8');
        assert_eq!(names(&h.app), vec!["db", "web", "cache"]);

        ch(&mut h.app, 'o');
        assert_eq!(names(&h.app), vec!["cache", "web", "db"]);

        ch(&mut h.app, '1');
        assert_eq!(names(&h.app), vec!["web", "db", "cache"]);
    }

    #[test]
    fn overlays_ignore_everything_but_their_toggle() {
        let mut h = harness(three_containers());
        ch(&mut h.app, 'h');
        assert_eq!(h.app.view.mode, Mode::Help);

        assert!(press(&mut h.app, KeyCode::Down).is_none());
        assert!(ch(&mut h.app, 'i').is_none());
        assert!(ch(&mut h.app, ' ').is_none());
        assert_eq!(h.app.view.mode, Mode::Help);
        assert_eq!(h.app.view.cursor.active, 0);
        assert!(h.app.snapshot.selected_ids().is_empty());

        ch(&mut h.app, 'h');
        assert_eq!(h.app.view.mode, Mode::Table);

        ch(&mut h.app, 'i');
        assert_eq!(h.app.view.mode, Mode::Detail);
        assert!(ch(&mut h.app, 'h').is_none());
        ch(&mut h.app, 'i');
        assert_eq!(h.app.view.mode, Mode::Table);
    }

    #[test]
    fn quit_works_in_every_mode() {
        let mut h = harness(three_containers());
        for mode in [Mode::Table, Mode::Help, Mode::Detail] {
            h.app.view.mode = mode;
            assert!(matches!(ch(&mut h.app, 'q'), Some(InputResult::Quit)));
            let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
            assert!(matches!(handle_key(&mut h.app, ctrl_c), Some(InputResult::Quit)));
        }
    }

    #[test]
    fn lifecycle_keys_target_the_selection() {
        let mut h = harness(three_containers());
        h.app.snapshot.get_mut("c1").unwrap().selected = true;
        h.app.snapshot.get_mut("c2").unwrap().selected = true;

        ch(&mut h.app, 'S');
        for _ in 0..2 {
            h.events.recv_timeout(Duration::from_secs(5)).unwrap();
        }
        let mut applied = h.engine.applied();
        applied.sort_by(|a, b| a.1.cmp(&b.1));
        assert_eq!(
            applied,
            vec![(Lifecycle::Stop, "c1".to_string()), (Lifecycle::Stop, "c2".to_string())]
        );
        assert_eq!(h.app.status_message.as_deref(), Some("stop sent to 2 containers"));
    }

    #[test]
    fn lifecycle_keys_map_to_verbs() {
        assert_eq!(lifecycle_for('s'), Some(Lifecycle::Start));
        assert_eq!(lifecycle_for('S'), Some(Lifecycle::Stop));
        assert_eq!(lifecycle_for('p'), Some(Lifecycle::Pause));
        assert_eq!(lifecycle_for('P'), Some(Lifecycle::Unpause));
        assert_eq!(lifecycle_for('k'), Some(Lifecycle::Kill));
        assert_eq!(lifecycle_for('r'), Some(Lifecycle::Remove));
        assert_eq!(lifecycle_for('x'), None);
    }

    #[test]
    fn lifecycle_on_empty_table_dispatches_nothing() {
        let engine = FakeEngine::default();
        engine.set_containers(vec![]);
        let mut h = harness(engine);
        ch(&mut h.app, 'k');
        assert!(h.events.recv_timeout(Duration::from_millis(50)).is_err());
        assert!(h.engine.applied().is_empty());
        assert!(h.app.status_message.is_none());
    }

    #[test]
    fn unknown_keys_are_not_consumed() {
        let mut h = harness(three_containers());
        assert!(ch(&mut h.app, 'z').is_none());
        assert!(press(&mut h.app, KeyCode::F(5)).is_none());
    }
}
