//! Cross-widget lifecycle and interaction tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use trellis_widgets::{
    event_types, Button, ButtonConfig, Event, Menu, MenuConfig, MenuItemConfig, Overlayable, Ui,
    View, Viewport, WidgetRef,
};

fn click(target: trellis_widgets::NodeId) -> Event {
    Event::pointer(event_types::CLICK, target, 0.0, 0.0, 0)
}

fn menu_with_items(ui: &mut Ui, name: &str) -> Menu {
    let mut menu = Menu::new(
        ui,
        MenuConfig::new()
            .name(name)
            .item(MenuItemConfig::new("Open"))
            .item(MenuItemConfig::new("Save")),
    );
    menu.render(ui, None).unwrap();
    menu
}

#[test]
fn repeated_render_destroy_cycles_leave_nothing_behind() {
    let mut ui = Ui::new();
    let body = ui.dom.body();
    let baseline_nodes = ui.dom.len();

    for cycle in 0..3 {
        let mut button = Button::new(&mut ui, ButtonConfig::new("Go").name("go-btn"));
        button.render(&mut ui, Some(body)).unwrap();
        assert!(ui.buttons.get("go-btn").is_some(), "cycle {cycle}");

        button.destroy(&mut ui);
        assert!(ui.buttons.get("go-btn").is_none(), "cycle {cycle}");
        assert!(ui.bindings.is_empty(), "cycle {cycle}");
        assert_eq!(ui.dom.len(), baseline_nodes, "cycle {cycle}");
        assert_eq!(ui.arena.len(), 0, "cycle {cycle}");
    }
}

#[test]
fn button_click_opens_and_second_click_closes_the_menu() {
    let mut ui = Ui::new();
    let body = ui.dom.body();
    let menu = menu_with_items(&mut ui, "file");
    let mut button = Button::new(&mut ui, ButtonConfig::new("File"));
    let root = button.render(&mut ui, Some(body)).unwrap();
    button.set_menu(&mut ui, Some(WidgetRef::Name("file")), None);

    button.handle_action(&mut ui, "onClick", &mut click(root));
    assert!(menu.is_visible(&ui));

    button.handle_action(&mut ui, "onClick", &mut click(root));
    assert!(!menu.is_visible(&ui));
}

#[test]
fn replacing_a_menu_detaches_and_destroys_the_old_one() {
    let mut ui = Ui::new();
    let body = ui.dom.body();
    let first = menu_with_items(&mut ui, "first");
    let first_id = first.id();
    let second = menu_with_items(&mut ui, "second");
    let mut button = Button::new(&mut ui, ButtonConfig::new("Menus"));
    button.render(&mut ui, Some(body)).unwrap();

    button.set_menu(&mut ui, Some(WidgetRef::Id(first_id)), None);
    let previous = button.set_menu(&mut ui, Some(WidgetRef::Id(second.id())), None);

    assert_eq!(previous, Some(first_id));
    assert_eq!(button.menu(&ui), Some(second.id()));
    // destroy_menu defaults on, so the replaced menu is fully gone.
    assert!(!ui.arena.is_live(first_id));
    assert!(ui.overlays.get("first").is_none());
    assert!(ui.ownership.owner_of(first_id).is_none());
}

#[test]
fn detached_menu_survives_when_destroy_old_is_off() {
    let mut ui = Ui::new();
    let body = ui.dom.body();
    let first = menu_with_items(&mut ui, "first");
    let mut button = Button::new(&mut ui, ButtonConfig::new("Menus"));
    button.render(&mut ui, Some(body)).unwrap();

    button.set_menu(&mut ui, Some(WidgetRef::Id(first.id())), None);
    button.set_menu(&mut ui, None, Some(false));

    assert!(ui.arena.is_live(first.id()));
    assert!(ui.ownership.owner_of(first.id()).is_none());
}

#[test]
fn empty_menu_is_suppressed_for_events_but_not_programmatically() {
    let mut ui = Ui::new();
    let body = ui.dom.body();
    let mut menu = Menu::new(&mut ui, MenuConfig::new().name("empty"));
    menu.render(&mut ui, None).unwrap();
    let mut button = Button::new(&mut ui, ButtonConfig::new("Empty"));
    let root = button.render(&mut ui, Some(body)).unwrap();
    button.set_menu(&mut ui, Some(WidgetRef::Name("empty")), None);

    button.handle_action(&mut ui, "onClick", &mut click(root));
    assert!(!menu.is_visible(&ui));

    // The API path ignores the suppression rule.
    menu.show_by(&mut ui, root, Default::default()).unwrap();
    assert!(menu.is_visible(&ui));
}

#[test]
fn dispatch_closes_menus_on_outside_clicks_only() {
    let mut ui = Ui::new();
    let body = ui.dom.body();
    let mut menu = menu_with_items(&mut ui, "file");
    let menu_id = menu.id();
    let mut button = Button::new(&mut ui, ButtonConfig::new("File"));
    let button_root = button.render(&mut ui, Some(body)).unwrap();
    let button_id = button.id();
    button.set_menu(&mut ui, Some(WidgetRef::Name("file")), None);

    let outside = ui.dom.create_element("div");
    ui.dom.append(body, outside);
    let item_node = menu.item(0).and_then(|i| i.node()).unwrap();

    // Opening click: the manager pass must not close the menu the same
    // event just opened.
    let mut event = click(button_root);
    ui.dispatch(&mut event, |ui, owner, action, event| {
        if owner == button_id {
            button.handle_action(ui, action, event);
        }
    });
    assert!(ui.is_overlay_visible(menu_id));

    // A click inside the open menu keeps it open.
    let mut event = click(item_node);
    ui.dispatch(&mut event, |ui, owner, action, event| {
        if owner == menu_id {
            menu.handle_action(ui, action, event);
        }
    });
    assert!(ui.is_overlay_visible(menu_id));

    // A click elsewhere closes it.
    let mut event = click(outside);
    ui.dispatch(&mut event, |_, _, _, _| {});
    assert!(!ui.is_overlay_visible(menu_id));
}

#[test]
fn dispatch_runs_local_actions_before_document_actions() {
    let mut ui = Ui::new();
    let body = ui.dom.body();
    let order = Arc::new(std::sync::Mutex::new(Vec::new()));

    let node = ui.dom.create_element("div");
    ui.dom.append(body, node);
    let local_owner = ui.arena.alloc("probe");
    let doc_owner = ui.arena.alloc("probe");
    ui.bindings.bind(node, event_types::CLICK, local_owner, "local");
    ui.bindings.bind_document(event_types::CLICK, doc_owner, "document");

    let seen = order.clone();
    let mut event = click(node);
    ui.dispatch(&mut event, |_, _, action, _| {
        seen.lock().unwrap().push(action);
    });
    assert_eq!(*order.lock().unwrap(), vec!["local", "document"]);
}

#[test]
fn stopping_propagation_skips_remaining_actions() {
    let mut ui = Ui::new();
    let body = ui.dom.body();
    let node = ui.dom.create_element("div");
    ui.dom.append(body, node);
    let owner = ui.arena.alloc("probe");
    ui.bindings.bind(node, event_types::CLICK, owner, "first");
    ui.bindings.bind_document(event_types::CLICK, owner, "second");

    let fired = Arc::new(AtomicUsize::new(0));
    let seen = fired.clone();
    let mut event = click(node);
    ui.dispatch(&mut event, |_, _, _, event| {
        seen.fetch_add(1, Ordering::SeqCst);
        event.stop_propagation();
    });
    assert_eq!(fired.load(Ordering::SeqCst), 1);
}

#[test]
fn menu_near_the_viewport_edge_flips_instead_of_clamping() {
    let mut ui = Ui::with_viewport(Viewport::new(400.0, 300.0));
    let body = ui.dom.body();
    let mut menu = Menu::new(
        &mut ui,
        MenuConfig::new()
            .name("edge")
            .width(200.0)
            .item(MenuItemConfig::new("Only")),
    );
    menu.render(&mut ui, None).unwrap();
    let mut button = Button::new(&mut ui, ButtonConfig::new("Edge"));
    let root = button.render(&mut ui, Some(body)).unwrap();
    ui.dom
        .set_bounds(root, trellis_widgets::Bounds::new(350.0, 10.0, 40.0, 30.0));
    button.set_menu(&mut ui, Some(WidgetRef::Name("edge")), None);

    assert!(button.show_menu(&mut ui, false));
    let menu_root = menu.root().unwrap();
    let bounds = ui.dom.bounds(menu_root);
    // Right edges line up; the menu grows leftward from the anchor.
    assert_eq!(bounds.x, 390.0 - 200.0);
}

#[test]
fn toggle_notifies_exactly_once_per_transition() {
    let mut ui = Ui::new();
    let body = ui.dom.body();
    let count = Arc::new(AtomicUsize::new(0));
    let seen = count.clone();
    let mut button = Button::new(&mut ui, ButtonConfig::new("T").enable_toggle(true))
        .on_toggle(move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });
    let root = button.render(&mut ui, Some(body)).unwrap();

    button.handle_action(&mut ui, "onClick", &mut click(root));
    button.handle_action(&mut ui, "onClick", &mut click(root));
    assert_eq!(count.load(Ordering::SeqCst), 2);

    // Forcing the current state and suppressed toggles add nothing.
    button.toggle(&mut ui, Some(false), false);
    button.toggle(&mut ui, Some(true), true);
    assert_eq!(count.load(Ordering::SeqCst), 2);
}

#[test]
fn destroying_a_button_takes_its_owned_menu_along() {
    let mut ui = Ui::new();
    let body = ui.dom.body();
    let menu = menu_with_items(&mut ui, "file");
    let menu_id = menu.id();
    let mut button = Button::new(&mut ui, ButtonConfig::new("File"));
    button.render(&mut ui, Some(body)).unwrap();
    button.set_menu(&mut ui, Some(WidgetRef::Id(menu_id)), None);

    button.destroy(&mut ui);
    assert!(!ui.arena.is_live(menu_id));
    assert!(ui.overlays.is_empty());
    assert!(ui.bindings.is_empty());
}
