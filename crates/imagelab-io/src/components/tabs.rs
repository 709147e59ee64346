//! Operation navigation.
//!
//! A scrollable strip of buttons, one per operation.  The selected
//! operation is highlighted with the accent border.

use dioxus::prelude::*;
use imagelab_core::Operation;

/// Props for the [`OperationTabs`] component.
#[derive(Props, Clone, PartialEq)]
pub struct OperationTabsProps {
    /// Currently selected operation.
    selected: Operation,
    /// Callback fired when a tab is clicked.
    on_select: EventHandler<Operation>,
}

/// Horizontal strip of operation tabs.
#[component]
pub fn OperationTabs(props: OperationTabsProps) -> Element {
    rsx! {
        nav {
            class: "flex flex-nowrap overflow-x-auto gap-2 py-2 scrollbar-thin",

            for operation in Operation::ALL {
                {render_tab(operation, props.selected == operation, props.on_select)}
            }
        }
    }
}

fn render_tab(operation: Operation, is_selected: bool, on_select: EventHandler<Operation>) -> Element {
    let border = if is_selected {
        "border-2 border-[var(--border-accent)]"
    } else {
        "border border-[var(--border)]"
    };

    rsx! {
        button {
            class: "flex-shrink-0 px-3 py-2 rounded cursor-pointer bg-[var(--surface)]
                    hover:bg-[var(--surface-active)] transition-colors {border}",
            onclick: move |_| on_select.call(operation),
            title: "{operation.label()}",
            "aria-pressed": "{is_selected}",

            span { class: "text-sm text-[var(--text)] hidden md:inline", "{operation.label()}" }
            span { class: "text-sm text-[var(--text)] md:hidden", "{operation.short_label()}" }
        }
    }
}
