//! Presentation layer: panels, controls, and the toast overlay.
//!
//! Views are deliberately thin: every interaction either sends a relay
//! event or calls one domain method. No state lives here beyond the two
//! atoms backing the filter controls.

use futures::{FutureExt, StreamExt, select};
use wasm_bindgen::JsCast;
use zoon::*;

use shared::{FilterPolicy, RenderFlag};

use crate::app::RouteScopeApp;
use crate::dataflow::{Atom, relay};
use crate::error_display::{ErrorAlert, ErrorDisplay, NotificationVariant};
use crate::signal_selection::{FilterCommand, SignalRow, SignalSelection};

const PAGE_BACKGROUND: &str = "oklch(16% 0.015 255)";
const PANEL_BACKGROUND: &str = "oklch(22% 0.02 255)";
const PANEL_BORDER: &str = "oklch(35% 0.02 255)";
const TEXT_PRIMARY: &str = "oklch(95% 0.01 255)";
const TEXT_MUTED: &str = "oklch(70% 0.02 255)";
const ACCENT: &str = "oklch(50% 0.14 255)";
const ACCENT_MUTED: &str = "oklch(32% 0.06 255)";
const ERROR_BACKGROUND: &str = "oklch(30% 0.09 25)";
const INFO_BACKGROUND: &str = "oklch(30% 0.07 255)";
const SUCCESS_BACKGROUND: &str = "oklch(32% 0.07 150)";

pub fn root(app: &RouteScopeApp) -> impl Element {
    Stack::new()
        .s(Height::screen())
        .s(Width::fill())
        .s(Background::new().color(PAGE_BACKGROUND))
        .s(Font::new().color(TEXT_PRIMARY).family([
            FontFamily::new("Inter"),
            FontFamily::new("system-ui"),
            FontFamily::SansSerif,
        ]))
        .layer(main_layout(app))
        .layer(toast_container(app))
}

fn main_layout(app: &RouteScopeApp) -> impl Element {
    Column::new()
        .s(Width::fill())
        .s(Height::fill())
        .s(Scrollbars::both())
        .s(Padding::all(16))
        .s(Gap::new().y(16))
        .item(header(app))
        .item(uploads_panel(app))
        .item(
            Row::new()
                .s(Width::fill())
                .s(Gap::new().x(16))
                .s(Align::new().top())
                .item(signals_panel(app))
                .item(controls_panel(app)),
        )
        .item(results_panel(app))
}

fn header(app: &RouteScopeApp) -> impl Element {
    Row::new()
        .s(Width::fill())
        .s(Gap::new().x(12))
        .s(Align::new().center_y())
        .item(
            El::new()
                .s(Font::new().size(20).weight(FontWeight::SemiBold))
                .child("RouteScope"),
        )
        .item(
            El::new()
                .s(Font::new().size(14).color(TEXT_MUTED))
                .child_signal(app.uploads.routing_status_signal().map(|status| Text::new(status))),
        )
        .item(
            El::new()
                .s(Font::new().size(13).color(TEXT_MUTED).italic())
                .child_signal(app.uploads.upload_in_progress_signal().map(|in_progress| {
                    Text::new(if in_progress { "Uploading…" } else { "" })
                })),
        )
}

// === UPLOADS ===

fn uploads_panel(app: &RouteScopeApp) -> impl Element {
    let uploads = app.uploads.clone();
    panel(
        "Design artifacts",
        Column::new()
            .s(Width::fill())
            .s(Gap::new().y(8))
            .item(upload_row(
                "Device architecture (.xml)",
                ".xml",
                {
                    let uploads = uploads.clone();
                    move |file| uploads.architecture_file_picked(file)
                },
                app.uploads.architecture_status_signal(),
            ))
            .item(upload_row(
                "Placed & routed circuit (.v, .blif)",
                ".v,.blif",
                {
                    let uploads = uploads.clone();
                    move |file| uploads.circuit_file_picked(file)
                },
                app.uploads.circuit_status_signal(),
            ))
            .item(upload_row(
                "Routing result (.route)",
                ".route",
                {
                    let uploads = uploads.clone();
                    move |file| uploads.routing_file_picked(file)
                },
                app.uploads.routing_status_signal(),
            )),
    )
}

fn upload_row(
    label: &'static str,
    accept: &'static str,
    on_pick: impl Fn(Option<web_sys::File>) + 'static,
    status: impl Signal<Item = String> + Unpin + 'static,
) -> impl Element {
    Row::new()
        .s(Width::fill())
        .s(Gap::new().x(12))
        .s(Align::new().center_y())
        .item(
            El::new()
                .s(Width::exact(280))
                .s(Font::new().size(14))
                .child(label),
        )
        .item(file_input(accept, on_pick))
        .item(
            El::new()
                .s(Font::new().size(13).color(TEXT_MUTED))
                .child_signal(status.map(|status| Text::new(status))),
        )
}

fn file_input(
    accept: &'static str,
    on_pick: impl Fn(Option<web_sys::File>) + 'static,
) -> impl Element {
    let raw_el = RawHtmlEl::new("input")
        .attr("type", "file")
        .attr("accept", accept)
        .style("color", TEXT_MUTED);
    let input: web_sys::HtmlInputElement = raw_el.dom_element().unchecked_into();
    raw_el
        .event_handler(move |_: events::Input| {
            on_pick(input.files().and_then(|files| files.get(0)));
        })
        .into_element()
}

// === SIGNALS PANEL ===

fn signals_panel(app: &RouteScopeApp) -> impl Element {
    let selection = app.selection.clone();
    panel(
        "Signals",
        Column::new()
            .s(Width::fill())
            .s(Gap::new().y(8))
            .item(
                Row::new()
                    .s(Gap::new().x(8))
                    .s(Align::new().center_y())
                    .item(small_button("Select all", {
                        let selection = selection.clone();
                        move || selection.select_all_clicked_relay.send(())
                    }))
                    .item(small_button("Deselect all", {
                        let selection = selection.clone();
                        move || selection.deselect_all_clicked_relay.send(())
                    }))
                    .item(
                        El::new()
                            .s(Font::new().size(13).color(TEXT_MUTED))
                            .child_signal(
                                map_ref! {
                                    let selected = selection.selected_count_signal(),
                                    let total = selection.catalog_len_signal() =>
                                    format!("{selected} of {total} selected")
                                }
                                .map(|summary| Text::new(summary)),
                            ),
                    ),
            )
            .item(filter_controls(&selection))
            .item(
                El::new()
                    .s(Width::fill())
                    .s(Height::exact(320))
                    .s(Scrollbars::both())
                    .child_signal(selection.rows_signal().map({
                        let selection = selection.clone();
                        move |rows| {
                            if rows.is_empty() {
                                El::new()
                                    .s(Padding::all(16))
                                    .s(Font::new().size(14).color(TEXT_MUTED).italic())
                                    .child("Upload a .route file to list its signals")
                                    .unify()
                            } else {
                                Column::new()
                                    .s(Width::fill())
                                    .s(Gap::new().y(2))
                                    .items(rows.into_iter().map({
                                        let selection = selection.clone();
                                        move |row| signal_row(&selection, row)
                                    }))
                                    .unify()
                            }
                        }
                    })),
            ),
    )
}

fn signal_row(selection: &SignalSelection, row: SignalRow) -> impl Element {
    let toggled_relay = selection.signal_toggled_relay.clone();
    let name = row.name.clone();
    let next = !row.included;
    Row::new()
        .s(Width::fill())
        .s(Gap::new().x(8))
        .s(Padding::new().x(8).y(4))
        .s(Align::new().center_y())
        .s(RoundedCorners::all(4))
        .s(Cursor::new(CursorIcon::Pointer))
        .s(Background::new().color(if row.included { ACCENT_MUTED } else { "transparent" }))
        .on_click(move || toggled_relay.send((name.clone(), next)))
        .item(
            El::new()
                .s(Width::exact(20))
                .child(if row.included { "☑" } else { "☐" }),
        )
        .item(
            El::new()
                .s(Width::fill())
                .s(Font::new().size(14))
                .child(row.name.clone()),
        )
        .item(
            El::new()
                .s(Font::new().size(12).color(TEXT_MUTED))
                .child(format!("{} segments", row.segment_count)),
        )
}

fn filter_controls(selection: &SignalSelection) -> impl Element {
    let policy = Atom::new(FilterPolicy::None);
    let raw_value = Atom::new(String::new());

    Column::new()
        .s(Width::fill())
        .s(Gap::new().y(6))
        .item(Row::new().s(Gap::new().x(4)).items(
            FilterPolicy::ALL.into_iter().map({
                let policy = policy.clone();
                move |candidate| policy_button(policy.clone(), candidate)
            }),
        ))
        .item(
            Row::new()
                .s(Gap::new().x(8))
                .s(Align::new().center_y())
                .item(threshold_input(raw_value.clone()))
                .item(small_button("Apply filter", {
                    let filter_applied_relay = selection.filter_applied_relay.clone();
                    let policy = policy.clone();
                    let raw_value = raw_value.clone();
                    move || {
                        filter_applied_relay.send(FilterCommand {
                            policy: policy.get_cloned(),
                            raw_value: raw_value.get_cloned(),
                        });
                    }
                })),
        )
}

fn policy_button(policy: Atom<FilterPolicy>, candidate: FilterPolicy) -> impl Element {
    let policy_for_background = policy.clone();
    Button::new()
        .s(Padding::new().x(10).y(4))
        .s(RoundedCorners::all(4))
        .s(Font::new().size(13))
        .s(Background::new().color_signal(
            policy_for_background
                .signal()
                .map(move |selected| if selected == candidate { ACCENT } else { ACCENT_MUTED }),
        ))
        .label(candidate.label())
        .on_press(move || policy.set(candidate))
}

fn threshold_input(raw_value: Atom<String>) -> impl Element {
    TextInput::new()
        .s(Width::exact(90))
        .s(Padding::new().x(8).y(4))
        .s(RoundedCorners::all(4))
        .s(Background::new().color(PAGE_BACKGROUND))
        .s(Borders::all(Border::new().width(1).color(PANEL_BORDER)))
        .s(Font::new().size(13).color(TEXT_PRIMARY))
        .label_hidden("Filter threshold")
        .placeholder(Placeholder::new("10"))
        .on_change(move |text| raw_value.set(text))
}

// === RENDERING CONTROLS ===

fn controls_panel(app: &RouteScopeApp) -> impl Element {
    let visualization = app.visualization.clone();
    let visualization_for_conflicts = app.visualization.clone();
    panel(
        "Rendering",
        Column::new()
            .s(Width::exact(300))
            .s(Gap::new().y(10))
            .item(options_list(&app.selection))
            .item(
                Column::new()
                    .s(Width::fill())
                    .s(Gap::new().y(6))
                    .item(primary_button("Render visualization", move || {
                        visualization.visualize_requested()
                    }))
                    .item(primary_button("Analyze conflicts", move || {
                        visualization_for_conflicts.conflicts_requested()
                    })),
            ),
    )
}

fn options_list(selection: &SignalSelection) -> impl Element {
    let selection = selection.clone();
    Column::new()
        .s(Width::fill())
        .s(Gap::new().y(2))
        .items(
            RenderFlag::ALL
                .into_iter()
                .map(move |flag| option_row(selection.clone(), flag)),
        )
}

fn option_row(selection: SignalSelection, flag: RenderFlag) -> impl Element {
    let toggled_relay = selection.render_flag_toggled_relay.clone();
    let selection_for_click = selection.clone();
    Row::new()
        .s(Width::fill())
        .s(Gap::new().x(8))
        .s(Padding::new().x(8).y(4))
        .s(Align::new().center_y())
        .s(RoundedCorners::all(4))
        .s(Cursor::new(CursorIcon::Pointer))
        .on_click(move || {
            let enabled = selection_for_click
                .snapshot()
                .options()
                .get(flag)
                .unwrap_or(false);
            toggled_relay.send((flag, !enabled));
        })
        .item(El::new().s(Width::exact(20)).child_signal(
            selection.options_signal().map(move |options| {
                if options.get(flag) == Some(true) { "☑" } else { "☐" }
            }),
        ))
        .item(El::new().s(Font::new().size(14)).child(flag.label()))
}

// === RESULTS ===

fn results_panel(app: &RouteScopeApp) -> impl Element {
    Row::new()
        .s(Width::fill())
        .s(Gap::new().x(16))
        .s(Align::new().top())
        .item(visualization_result(app))
        .item(conflict_result(app))
}

fn visualization_result(app: &RouteScopeApp) -> impl Element {
    let visualization = app.visualization.clone();
    panel(
        "Visualization",
        Column::new()
            .s(Width::fill())
            .s(Gap::new().y(8))
            .item(
                El::new()
                    .s(Font::new().size(13).color(TEXT_MUTED))
                    .child_signal(visualization.signals_visualized_signal().map(|count| {
                        Text::new(match count {
                            Some(count) => format!("{count} signals rendered"),
                            None => String::new(),
                        })
                    })),
            )
            .item(
                El::new()
                    .s(Width::fill())
                    .child_signal(visualization.image_url_signal().map(|url| match url {
                        Some(url) => result_image(&url, "Routing visualization").unify(),
                        None => El::new()
                            .s(Font::new().size(14).color(TEXT_MUTED).italic())
                            .child("No visualization yet")
                            .unify(),
                    })),
            ),
    )
}

fn conflict_result(app: &RouteScopeApp) -> impl Element {
    let visualization = app.visualization.clone();
    panel(
        "Conflict analysis",
        El::new().s(Width::fill()).child_signal(
            visualization.conflict_report_signal().map(|report| {
                let Some(report) = report else {
                    return El::new()
                        .s(Font::new().size(14).color(TEXT_MUTED).italic())
                        .child("No analysis yet")
                        .unify();
                };

                let mut column = Column::new()
                    .s(Width::fill())
                    .s(Gap::new().y(8))
                    .item(
                        El::new()
                            .s(Font::new().size(13).color(TEXT_MUTED))
                            .child(format!(
                                "{} signals analyzed",
                                report.num_signals.unwrap_or(report.hubs.len())
                            )),
                    )
                    .item(
                        El::new()
                            .s(Font::new().size(14).weight(FontWeight::SemiBold))
                            .child("Hub signals"),
                    )
                    .item(if report.hubs.is_empty() {
                        El::new()
                            .s(Font::new().size(13).color(TEXT_MUTED))
                            .child("No conflict hubs identified")
                            .unify()
                    } else {
                        Column::new()
                            .s(Gap::new().y(2))
                            .items(report.hubs.iter().map(|hub| {
                                El::new().s(Font::new().size(13)).child(hub.clone())
                            }))
                            .unify()
                    })
                    .item(
                        Column::new().s(Gap::new().y(2)).items(
                            report.metrics.iter().map(|(name, value)| {
                                Row::new()
                                    .s(Width::fill())
                                    .s(Gap::new().x(8))
                                    .item(
                                        El::new()
                                            .s(Width::fill())
                                            .s(Font::new().size(13).color(TEXT_MUTED))
                                            .child(name.clone()),
                                    )
                                    .item(
                                        El::new()
                                            .s(Font::new().size(13))
                                            .child(format!("{value:.3}")),
                                    )
                            }),
                        ),
                    );

                if let Some(url) = report.image_url.as_ref() {
                    column = column.item(result_image(url, "Conflict graph"));
                }
                column.unify()
            }),
        ),
    )
}

fn result_image(url: &str, alt: &'static str) -> impl Element {
    RawHtmlEl::new("img")
        .attr("src", url)
        .attr("alt", alt)
        .style("max-width", "100%")
        .style("border-radius", "6px")
        .into_element()
}

// === TOASTS ===

fn toast_container(app: &RouteScopeApp) -> impl Element {
    let errors = app.errors.clone();
    El::new()
        .s(Align::new().top().right())
        .s(Padding::all(16))
        .update_raw_el(|raw_el| {
            raw_el
                .style("position", "fixed")
                .style("top", "0")
                .style("right", "0")
                .style("z-index", "1000")
                .style("pointer-events", "none")
        })
        .child(
            Column::new()
                .s(Gap::new().y(8))
                .s(Width::exact(360))
                .update_raw_el(|raw_el| raw_el.style("pointer-events", "auto"))
                .items_signal_vec(errors.active_toasts.signal_vec().map({
                    let errors = errors.clone();
                    move |alert| toast_element(&errors, alert)
                })),
        )
}

fn toast_element(errors: &ErrorDisplay, alert: ErrorAlert) -> impl Element {
    let (dismiss_clicked_relay, mut dismiss_clicked_stream) = relay::<()>();
    let toast_dismissed_relay = errors.toast_dismissed_relay.clone();
    let alert_id = alert.id.clone();
    let auto_dismiss_ms = alert.auto_dismiss_ms;

    // The toast dismisses itself unless clicked away first.
    Task::start(async move {
        select! {
            // NOTE: .fuse() needed, Timer::sleep is not a fused future
            _ = Timer::sleep(auto_dismiss_ms).fuse() => {}
            _ = dismiss_clicked_stream.next() => {}
        }
        toast_dismissed_relay.send(alert_id);
    });

    let background = match alert.variant {
        NotificationVariant::Error => ERROR_BACKGROUND,
        NotificationVariant::Info => INFO_BACKGROUND,
        NotificationVariant::Success => SUCCESS_BACKGROUND,
    };

    Column::new()
        .s(Width::fill())
        .s(Padding::all(12))
        .s(Gap::new().y(4))
        .s(Background::new().color(background))
        .s(RoundedCorners::all(8))
        .s(Borders::all(Border::new().width(1).color(PANEL_BORDER)))
        .s(Cursor::new(CursorIcon::Pointer))
        .update_raw_el(|raw_el| raw_el.attr("title", "Click to dismiss"))
        .on_click(move || dismiss_clicked_relay.send(()))
        .item(
            El::new()
                .s(Font::new().size(14).weight(FontWeight::SemiBold))
                .child(alert.title.clone()),
        )
        .item(El::new().s(Font::new().size(13)).child(alert.message.clone()))
}

// === SHARED BUILDING BLOCKS ===

fn panel(title: &'static str, content: impl Element) -> impl Element {
    Column::new()
        .s(Width::fill())
        .s(Padding::all(12))
        .s(Gap::new().y(8))
        .s(Background::new().color(PANEL_BACKGROUND))
        .s(RoundedCorners::all(8))
        .s(Borders::all(Border::new().width(1).color(PANEL_BORDER)))
        .item(
            El::new()
                .s(Font::new().size(16).weight(FontWeight::SemiBold))
                .child(title),
        )
        .item(content)
}

fn small_button(label: &'static str, on_press: impl FnMut() + 'static) -> impl Element {
    Button::new()
        .s(Padding::new().x(10).y(4))
        .s(RoundedCorners::all(4))
        .s(Background::new().color(ACCENT_MUTED))
        .s(Font::new().size(13))
        .label(label)
        .on_press(on_press)
}

fn primary_button(label: &'static str, on_press: impl FnMut() + 'static) -> impl Element {
    Button::new()
        .s(Width::fill())
        .s(Padding::new().x(12).y(8))
        .s(RoundedCorners::all(6))
        .s(Background::new().color(ACCENT))
        .s(Font::new().size(14).weight(FontWeight::Medium))
        .s(Align::new().center_x())
        .label(label)
        .on_press(on_press)
}
