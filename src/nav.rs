use crate::Record;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    List,
    /// Detail view keyed by the string form of a user id.
    Detail(String),
}

#[derive(Debug, Default)]
pub struct Navigator {
    current: Route,
}

impl Navigator {
    pub fn current(&self) -> &Route {
        &self.current
    }

    pub fn to_list(&mut self) {
        self.current = Route::List;
    }

    /// Open the detail view for `record`. Records without a truthy id have no detail route.
    pub fn to_detail(&mut self, record: &Record) -> bool {
        if !record.has_truthy_id() {
            return false;
        }
        let Some(id) = record.id_key() else {
            return false;
        };
        self.current = Route::Detail(id);
        true
    }
}
