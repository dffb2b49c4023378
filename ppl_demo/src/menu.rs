use systems::{
    plugin::{DataAccess, Host},
    simulation::{DataAccessError, SimulatorReaderWriter},
    ui::{Action, MenuId, MenuItemId},
};
use tracing::info;

/// Sets the published `PPLDemo/foo` value to 42.
pub struct Foo {
    value: i32,
}
impl Foo {
    pub const KEY: &'static str = "PPLDemo/foo";
    const ANSWER: i32 = 42;

    pub fn new() -> Self {
        Self { value: 0 }
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    pub fn set_value(&mut self, value: f64) -> Result<(), DataAccessError> {
        if !value.is_finite() || value < i32::MIN as f64 || value > i32::MAX as f64 {
            return Err(DataAccessError::Rejected {
                name: Foo::KEY.to_owned(),
                reason: format!("{} is not a valid integer", value),
            });
        }

        self.value = value.round() as i32;
        Ok(())
    }
}
impl Default for Foo {
    fn default() -> Self {
        Self::new()
    }
}
impl Action for Foo {
    fn name(&self) -> String {
        "Foo".to_owned()
    }

    fn do_action(&mut self) {
        self.value = Foo::ANSWER;
        info!(value = self.value, "Foo was selected.");
    }
}

/// The "Hello" menu with its "Foo" item.
pub struct DemoMenu {
    menu: Option<MenuId>,
    foo_item: Option<MenuItemId>,
    foo: Foo,
}
impl DemoMenu {
    pub const TITLE: &'static str = "Hello";

    pub fn new() -> Self {
        Self {
            menu: None,
            foo_item: None,
            foo: Foo::new(),
        }
    }

    pub fn create<T: SimulatorReaderWriter>(&mut self, host: &mut Host<T>) {
        if self.menu.is_some() {
            return;
        }

        let menu = host.ui_mut().create_menu(DemoMenu::TITLE);
        self.foo_item = host.ui_mut().append_menu_item(menu, &self.foo.name());
        self.menu = Some(menu);
        host.publish_data(Foo::KEY, DataAccess::ReadWrite);
    }

    pub fn destroy<T: SimulatorReaderWriter>(&mut self, host: &mut Host<T>) {
        if let Some(menu) = self.menu.take() {
            host.ui_mut().destroy_menu(menu);
        }

        self.foo_item = None;
        host.unpublish_data(Foo::KEY);
    }

    /// Returns whether the item belongs to this menu.
    pub fn select(&mut self, item: MenuItemId) -> bool {
        if self.foo_item == Some(item) {
            self.foo.do_action();
            true
        } else {
            false
        }
    }

    pub fn foo(&self) -> &Foo {
        &self.foo
    }

    pub fn foo_mut(&mut self) -> &mut Foo {
        &mut self.foo
    }
}
impl Default for DemoMenu {
    fn default() -> Self {
        Self::new()
    }
}
