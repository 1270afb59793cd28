use crate::fetch::{self, PendingFetch};
use crate::nav::{Navigator, Route};
use crate::{
    AppConfig, RecordStore, Snapshot, SubscriptionId, UserSource, UserValue, projection, schema,
    statics,
};
use eframe::egui;
use egui_extras::{Column, TableBuilder};
use std::{cell::RefCell, collections::HashMap, rc::Rc, sync::Arc};

pub fn run_gui(config: AppConfig) -> eframe::Result {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1280.0, 900.0]),
        ..Default::default()
    };
    let title = format!("{} {}", statics::EN_APP_TITLE, env!("CARGO_PKG_VERSION"));
    let source = config.build_source();
    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| Ok(Box::new(UsersApp::new(&cc.egui_ctx, source)))),
    )
}

/// What the list view renders; refreshed by the store subscription.
#[derive(Default)]
struct TableView {
    users: Snapshot,
    headers: Vec<String>,
}

/// User gestures collected during a frame and applied after rendering.
#[derive(Clone, Debug, PartialEq)]
enum UiAction {
    OpenDetail(usize),
    StartEdit(usize),
    EditField { field: String, text: String },
    SaveEdit,
    CancelEdit,
    RevertEdit,
    EditFromDetail(String),
    BackToList,
    Reload,
}

/// The main application state: owns the store, the navigation state and the input buffers
/// of the row being edited.
struct UsersApp {
    store: RecordStore,
    table: Rc<RefCell<TableView>>,
    subscription: SubscriptionId,
    source: Arc<dyn UserSource>,
    pending: Vec<PendingFetch>,
    nav: Navigator,
    edit_buffers: HashMap<String, String>,
    status: String,
    last_error: Option<String>,
}

impl UsersApp {
    fn new(ctx: &egui::Context, source: Arc<dyn UserSource>) -> Self {
        let mut app = Self::idle(source);
        app.reload(ctx);
        app
    }

    fn idle(source: Arc<dyn UserSource>) -> Self {
        let mut store = RecordStore::new();
        let table = Rc::new(RefCell::new(TableView::default()));
        let view = Rc::clone(&table);
        let subscription = store.subscribe(move |users| {
            let mut view = view.borrow_mut();
            view.headers = schema::derive_headers(users);
            view.users = Arc::clone(users);
        });

        Self {
            store,
            table,
            subscription,
            source,
            pending: Vec::new(),
            nav: Navigator::default(),
            edit_buffers: HashMap::new(),
            status: String::new(),
            last_error: None,
        }
    }

    fn reload(&mut self, ctx: &egui::Context) {
        let ctx = ctx.clone();
        self.pending.push(fetch::spawn_fetch(
            Arc::clone(&self.source),
            move || ctx.request_repaint(),
        ));
        self.status = statics::EN_STATUS_LOADING.to_string();
    }

    /// Apply finished fetches in the order they are seen; the last one wins.
    fn poll_fetches(&mut self) {
        for pending in std::mem::take(&mut self.pending) {
            match pending.try_take() {
                Some(result) => fetch::apply_fetch_result(&mut self.store, result),
                None => self.pending.push(pending),
            }
        }
        if self.pending.is_empty() && self.status == statics::EN_STATUS_LOADING {
            self.status.clear();
        }
    }

    fn report<T>(&mut self, result: Result<T, crate::EditError>, status: &str) {
        match result {
            Ok(_) => {
                self.status = status.to_string();
                self.last_error = None;
            }
            Err(e) => self.last_error = Some(e.to_string()),
        }
    }

    /// An edit is open but a replacement collection dropped its record, so no row
    /// carries the Save/Cancel controls.
    fn edit_lost_its_row(&self) -> bool {
        self.store.is_editing() && self.store.editing_row().is_none()
    }

    fn apply(&mut self, ctx: &egui::Context, action: UiAction) {
        match action {
            UiAction::OpenDetail(index) => {
                if self.store.is_editing() {
                    return;
                }
                let users = Arc::clone(&self.table.borrow().users);
                if let Some(record) = users.get(index) {
                    self.nav.to_detail(record);
                }
            }
            UiAction::StartEdit(row) => {
                self.edit_buffers.clear();
                let result = self.store.start_edit_at(row).map(|_| ());
                self.report(result, statics::EN_STATUS_EDITING);
            }
            UiAction::EditField { field, text } => {
                let result = self.store.update_field(&field, UserValue::String(text));
                if let Err(e) = result {
                    self.last_error = Some(e.to_string());
                }
            }
            UiAction::SaveEdit => {
                self.edit_buffers.clear();
                let result = self.store.save_edit();
                self.report(result, statics::EN_STATUS_SAVED);
            }
            UiAction::CancelEdit => {
                self.edit_buffers.clear();
                let result = self.store.cancel_edit();
                self.report(result, statics::EN_STATUS_CANCELLED);
            }
            UiAction::RevertEdit => {
                self.edit_buffers.clear();
                let result = self.store.revert_edit();
                self.report(result, statics::EN_STATUS_REVERTED);
            }
            UiAction::EditFromDetail(id) => {
                self.nav.to_list();
                self.edit_buffers.clear();
                let result = self.store.start_edit(&id).map(|_| ());
                self.report(result, statics::EN_STATUS_EDITING);
            }
            UiAction::BackToList => self.nav.to_list(),
            UiAction::Reload => self.reload(ctx),
        }
    }

    fn render_list(&mut self, ui: &mut egui::Ui, actions: &mut Vec<UiAction>) {
        let (users, headers) = {
            let view = self.table.borrow();
            (Arc::clone(&view.users), view.headers.clone())
        };
        let is_editing = self.store.is_editing();
        let working = self.store.edit_session().map(|s| s.working().clone());
        let editing_row = self.store.editing_row();
        let lost_row = self.edit_lost_its_row();

        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                ui.heading(statics::EN_HEADING_USERS_LIST);
                ui.label(format!("{} {}", statics::EN_LABEL_TOTAL_USERS, users.len()));
            });
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .add_enabled(!is_editing, egui::Button::new(statics::EN_BTN_RELOAD))
                    .clicked()
                {
                    actions.push(UiAction::Reload);
                }
                if is_editing {
                    ui.label(
                        egui::RichText::new(statics::EN_BADGE_EDITING)
                            .color(ui.visuals().warn_fg_color)
                            .strong(),
                    );
                }
            });
        });
        if lost_row {
            ui.horizontal(|ui| {
                ui.colored_label(ui.visuals().warn_fg_color, statics::EN_EDITED_USER_GONE);
                if ui.button(statics::EN_BTN_CANCEL).clicked() {
                    actions.push(UiAction::CancelEdit);
                }
            });
        }
        ui.separator();

        if users.is_empty() {
            ui.vertical_centered(|ui| {
                ui.add_space(24.0);
                ui.label(statics::EN_LOADING_USERS);
                ui.spinner();
            });
            return;
        }

        let buffers = &mut self.edit_buffers;
        let row_h = ui.text_style_height(&egui::TextStyle::Body) + 10.0;
        egui::ScrollArea::horizontal().show(ui, |ui| {
            TableBuilder::new(ui)
                .striped(true)
                .sense(egui::Sense::click())
                .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                .columns(
                    Column::initial(140.0).at_least(60.0).resizable(true).clip(true),
                    headers.len(),
                )
                .column(Column::auto())
                .header(row_h, |mut header| {
                    for h in &headers {
                        header.col(|ui| {
                            ui.strong(h.as_str());
                        });
                    }
                    header.col(|ui| {
                        ui.strong(statics::EN_COL_ACTIONS);
                    });
                })
                .body(|body| {
                    body.rows(row_h, users.len(), |mut row| {
                        let index = row.index();
                        let record = &users[index];
                        let editing = editing_row == Some(index);
                        let shown = match (&working, editing) {
                            (Some(working), true) => working,
                            _ => record,
                        };

                        for h in &headers {
                            row.col(|ui| {
                                if editing && projection::is_editable_field(h) {
                                    let buf = buffers.entry(h.clone()).or_insert_with(|| {
                                        projection::editing_text(shown.get(h))
                                    });
                                    let edit = egui::TextEdit::singleline(buf).desired_width(f32::INFINITY);
                                    if ui.add(edit).changed() {
                                        actions.push(UiAction::EditField {
                                            field: h.clone(),
                                            text: buf.clone(),
                                        });
                                    }
                                } else {
                                    let value = shown.get(h);
                                    let text = projection::format_table_value(value);
                                    let mut label = egui::Label::new(text.as_str());
                                    if projection::should_truncate(value) {
                                        label = label.truncate();
                                    }
                                    let resp = ui.add(label);
                                    let full = projection::editing_text(value);
                                    if !full.is_empty() {
                                        resp.on_hover_text(full);
                                    }
                                }
                            });
                        }

                        row.col(|ui| {
                            if editing {
                                if ui.button(statics::EN_BTN_SAVE).clicked() {
                                    actions.push(UiAction::SaveEdit);
                                }
                                if ui.button(statics::EN_BTN_CANCEL).clicked() {
                                    actions.push(UiAction::CancelEdit);
                                }
                                if ui.button(statics::EN_BTN_REVERT).clicked() {
                                    actions.push(UiAction::RevertEdit);
                                }
                            } else if record.id_key().is_some() {
                                let button = egui::Button::new(statics::EN_BTN_EDIT);
                                if ui.add_enabled(!is_editing, button).clicked() {
                                    actions.push(UiAction::StartEdit(index));
                                }
                            }
                        });

                        if !is_editing && row.response().clicked() {
                            actions.push(UiAction::OpenDetail(index));
                        }
                    });
                });
        });
    }

    fn render_detail(&self, ui: &mut egui::Ui, id: &str, actions: &mut Vec<UiAction>) {
        if ui.button(statics::EN_BTN_BACK).clicked() {
            actions.push(UiAction::BackToList);
        }
        ui.heading(statics::EN_HEADING_USER_DETAILS);
        ui.label(statics::EN_USER_DETAILS_SUBTITLE);
        ui.separator();

        let Some(record) = self.store.lookup_by_id(id) else {
            ui.vertical_centered(|ui| {
                ui.add_space(24.0);
                ui.heading(statics::EN_HEADING_NOT_FOUND);
                ui.label(statics::EN_NOT_FOUND_BODY);
                if ui.button(statics::EN_BTN_BACK).clicked() {
                    actions.push(UiAction::BackToList);
                }
            });
            return;
        };

        ui.heading(projection::display_name(Some(record)));
        ui.label(format!(
            "{}{}",
            statics::EN_PREFIX_ID,
            projection::editing_text(record.id())
        ));
        ui.add_space(8.0);

        egui::ScrollArea::vertical()
            .max_height((ui.available_height() - 48.0).max(80.0))
            .show(ui, |ui| {
                egui::Grid::new("user_detail_fields")
                    .num_columns(2)
                    .striped(true)
                    .spacing([24.0, 8.0])
                    .show(ui, |ui| {
                        for field in schema::detail_field_keys(record) {
                            let label = projection::format_field_name(field).to_uppercase();
                            ui.label(egui::RichText::new(label).small().weak());

                            let value = record.get(field);
                            let text = projection::format_field_value(value);
                            if value.is_some_and(UserValue::is_structured) {
                                ui.monospace(text);
                            } else {
                                ui.label(text);
                            }
                            ui.end_row();
                        }
                    });
            });

        ui.separator();
        ui.horizontal(|ui| {
            if ui.button(statics::EN_BTN_BACK).clicked() {
                actions.push(UiAction::BackToList);
            }
            if ui.button(statics::EN_BTN_EDIT_USER).clicked() {
                actions.push(UiAction::EditFromDetail(id.to_string()));
            }
        });
    }
}

impl Drop for UsersApp {
    fn drop(&mut self) {
        self.store.unsubscribe(self.subscription);
    }
}

impl eframe::App for UsersApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_fetches();

        let mut actions = Vec::new();
        if self.store.is_editing() && ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            actions.push(UiAction::CancelEdit);
        }

        egui::TopBottomPanel::top("title_bar").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.heading(statics::EN_APP_TITLE);
            ui.label(statics::EN_APP_SUBTITLE);
            ui.add_space(6.0);
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            if let Some(err) = &self.last_error {
                ui.colored_label(ui.visuals().error_fg_color, err);
            } else {
                ui.label(&self.status);
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| match self.nav.current().clone() {
            Route::List => self.render_list(ui, &mut actions),
            Route::Detail(id) => self.render_detail(ui, &id, &mut actions),
        });

        for action in actions {
            self.apply(ctx, action);
        }
    }
}
