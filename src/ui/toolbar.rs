// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar and tool selection UI.

use crate::app::Tool;

/// Display the toolbar with tool selection buttons.
pub fn show(ui: &mut egui::Ui, current_tool: &mut Tool) {
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        ui.label("Tools:");

        ui.separator();

        for tool in Tool::ALL {
            if ui
                .selectable_label(*current_tool == tool, tool.label())
                .clicked()
            {
                *current_tool = tool;
            }
        }

        ui.separator();

        let tool_text = match current_tool {
            Tool::Select => "Drag to pan the page",
            Tool::Rectangle | Tool::Ellipse | Tool::Diamond => "Drag to draw the shape",
            Tool::Line | Tool::Arrow => "Drag from start to end point",
            Tool::Freedraw => "Drag to draw freehand",
            Tool::Text => "Click to place text, Enter to finish",
            Tool::Image => "Click to insert an image file",
            Tool::Eraser => "Click an element to remove it",
        };

        ui.label(egui::RichText::new(tool_text).italics().weak());
    });
}
