//! Headless models of the host's UI widgets. The host owns the widgets once shown;
//! plugins refer to them by id.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(pub(crate) usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DisplayId(pub(crate) usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MenuId(pub(crate) usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MenuItemId(pub(crate) usize);

#[derive(Clone, Debug, PartialEq)]
pub struct MessageWindow {
    pub left: i32,
    pub top: i32,
    pub title: String,
    pub message: String,
    /// Closing the window asks the host to quit.
    pub quit_on_close: bool,
}
impl MessageWindow {
    pub fn new(left: i32, top: i32, title: &str, message: &str, quit_on_close: bool) -> Self {
        Self {
            left,
            top,
            title: title.to_owned(),
            message: message.to_owned(),
            quit_on_close,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct OnScreenDisplay {
    pub width: i32,
    pub height: i32,
    pub text: String,
}
impl OnScreenDisplay {
    pub fn new(width: i32, height: i32, text: &str) -> Self {
        Self {
            width,
            height,
            text: text.to_owned(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Menu {
    pub title: String,
    pub items: Vec<(MenuItemId, String)>,
}
impl Menu {
    pub(crate) fn new(title: &str) -> Self {
        Self {
            title: title.to_owned(),
            items: vec![],
        }
    }

    pub fn item_named(&self, name: &str) -> Option<MenuItemId> {
        self.items
            .iter()
            .find(|(_, item_name)| item_name == name)
            .map(|(id, _)| *id)
    }
}

/// Something a menu item does when selected.
pub trait Action {
    fn name(&self) -> String;
    fn do_action(&mut self);
}

/// The widgets currently shown by the host.
#[derive(Default)]
pub struct Ui {
    next_id: usize,
    windows: Vec<(WindowId, MessageWindow)>,
    displays: Vec<(DisplayId, OnScreenDisplay)>,
    menus: Vec<(MenuId, Menu)>,
    quit_requested: bool,
}
impl Ui {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> usize {
        self.next_id += 1;
        self.next_id
    }

    pub fn open_window(&mut self, window: MessageWindow) -> WindowId {
        let id = WindowId(self.next_id());
        self.windows.push((id, window));

        id
    }

    /// Closes the window as the user would.
    pub fn close_window(&mut self, id: WindowId) -> Option<MessageWindow> {
        let index = self.windows.iter().position(|(x, _)| *x == id)?;
        let (_, window) = self.windows.remove(index);
        if window.quit_on_close {
            self.quit_requested = true;
        }

        Some(window)
    }

    /// Closes the window without side effects, as a plugin would when cleaning up.
    pub fn destroy_window(&mut self, id: WindowId) -> Option<MessageWindow> {
        let index = self.windows.iter().position(|(x, _)| *x == id)?;
        Some(self.windows.remove(index).1)
    }

    pub fn window(&self, id: WindowId) -> Option<&MessageWindow> {
        self.windows.iter().find(|(x, _)| *x == id).map(|(_, w)| w)
    }

    pub fn windows(&self) -> impl Iterator<Item = &MessageWindow> {
        self.windows.iter().map(|(_, window)| window)
    }

    pub fn window_ids(&self) -> impl Iterator<Item = WindowId> + '_ {
        self.windows.iter().map(|(id, _)| *id)
    }

    pub fn show_display(&mut self, display: OnScreenDisplay) -> DisplayId {
        let id = DisplayId(self.next_id());
        self.displays.push((id, display));

        id
    }

    pub fn hide_display(&mut self, id: DisplayId) -> Option<OnScreenDisplay> {
        let index = self.displays.iter().position(|(x, _)| *x == id)?;
        Some(self.displays.remove(index).1)
    }

    pub fn displays(&self) -> impl Iterator<Item = &OnScreenDisplay> {
        self.displays.iter().map(|(_, display)| display)
    }

    pub fn create_menu(&mut self, title: &str) -> MenuId {
        let id = MenuId(self.next_id());
        self.menus.push((id, Menu::new(title)));

        id
    }

    pub fn append_menu_item(&mut self, menu: MenuId, name: &str) -> Option<MenuItemId> {
        let id = MenuItemId(self.next_id());
        let (_, menu) = self.menus.iter_mut().find(|(x, _)| *x == menu)?;
        menu.items.push((id, name.to_owned()));

        Some(id)
    }

    pub fn destroy_menu(&mut self, id: MenuId) -> Option<Menu> {
        let index = self.menus.iter().position(|(x, _)| *x == id)?;
        Some(self.menus.remove(index).1)
    }

    pub fn menu_titled(&self, title: &str) -> Option<&Menu> {
        self.menus
            .iter()
            .find(|(_, menu)| menu.title == title)
            .map(|(_, menu)| menu)
    }

    pub fn has_menu_item(&self, id: MenuItemId) -> bool {
        self.menus
            .iter()
            .any(|(_, menu)| menu.items.iter().any(|(x, _)| *x == id))
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }
}
