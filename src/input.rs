use egui::{Context, PointerButton, Pos2, Rect, TouchPhase};

/// Pointer and touch input in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Primary mouse button was pressed
    PointerDown { position: Pos2 },
    /// Mouse moved (with or without buttons pressed)
    PointerMove { position: Pos2 },
    /// Primary mouse button was released
    PointerUp { position: Pos2 },
    /// Mouse left the canvas
    PointerLeave { position: Pos2 },
    TouchStart { id: u64, position: Pos2 },
    TouchMove { id: u64, position: Pos2 },
    TouchEnd { id: u64, position: Pos2 },
    TouchCancel { id: u64, position: Pos2 },
}

impl InputEvent {
    pub fn position(&self) -> Pos2 {
        match self {
            InputEvent::PointerDown { position }
            | InputEvent::PointerMove { position }
            | InputEvent::PointerUp { position }
            | InputEvent::PointerLeave { position }
            | InputEvent::TouchStart { position, .. }
            | InputEvent::TouchMove { position, .. }
            | InputEvent::TouchEnd { position, .. }
            | InputEvent::TouchCancel { position, .. } => *position,
        }
    }

    /// The touch this event belongs to, `None` for mouse events
    pub fn touch_id(&self) -> Option<u64> {
        match self {
            InputEvent::TouchStart { id, .. }
            | InputEvent::TouchMove { id, .. }
            | InputEvent::TouchEnd { id, .. }
            | InputEvent::TouchCancel { id, .. } => Some(*id),
            _ => None,
        }
    }
}

/// Handles converting raw egui input into canvas InputEvents
pub struct InputHandler {
    last_pointer_pos: Option<Pos2>,
    pointer_in_canvas: bool,
    canvas_rect: Rect,
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new(Rect::NOTHING)
    }
}

impl InputHandler {
    pub fn new(canvas_rect: Rect) -> Self {
        Self {
            last_pointer_pos: None,
            pointer_in_canvas: false,
            canvas_rect,
        }
    }

    /// Update the canvas rectangle (e.g. if window is resized)
    pub fn set_canvas_rect(&mut self, rect: Rect) {
        self.canvas_rect = rect;
    }

    /// Process this frame's raw egui input
    pub fn process_input(&mut self, ctx: &Context) -> Vec<InputEvent> {
        let raw_events = ctx.input(|input| input.events.clone());
        self.translate(&raw_events)
    }

    /// Translate egui events, dropping those that don't concern the canvas
    pub fn translate(&mut self, raw_events: &[egui::Event]) -> Vec<InputEvent> {
        let mut events = Vec::new();

        for event in raw_events {
            match event {
                egui::Event::PointerMoved(pos) => {
                    let inside = self.canvas_rect.contains(*pos);
                    if inside {
                        events.push(InputEvent::PointerMove { position: *pos });
                    } else if self.pointer_in_canvas {
                        events.push(InputEvent::PointerLeave {
                            position: self.last_pointer_pos.unwrap_or(*pos),
                        });
                    }
                    self.pointer_in_canvas = inside;
                    self.last_pointer_pos = Some(*pos);
                }
                egui::Event::PointerButton {
                    pos,
                    button: PointerButton::Primary,
                    pressed,
                    ..
                } => {
                    if *pressed {
                        if self.canvas_rect.contains(*pos) {
                            events.push(InputEvent::PointerDown { position: *pos });
                        }
                    } else {
                        events.push(InputEvent::PointerUp { position: *pos });
                    }
                }
                egui::Event::PointerGone => {
                    if let (true, Some(pos)) = (self.pointer_in_canvas, self.last_pointer_pos) {
                        events.push(InputEvent::PointerLeave { position: pos });
                    }
                    self.pointer_in_canvas = false;
                    self.last_pointer_pos = None;
                }
                egui::Event::Touch { id, phase, pos, .. } => {
                    let id = id.0;
                    let position = *pos;
                    match phase {
                        TouchPhase::Start => {
                            if self.canvas_rect.contains(position) {
                                events.push(InputEvent::TouchStart { id, position });
                            }
                        }
                        TouchPhase::Move => events.push(InputEvent::TouchMove { id, position }),
                        TouchPhase::End => events.push(InputEvent::TouchEnd { id, position }),
                        TouchPhase::Cancel => events.push(InputEvent::TouchCancel { id, position }),
                    }
                }
                _ => {}
            }
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, Modifiers, TouchDeviceId, TouchId};

    fn handler() -> InputHandler {
        InputHandler::new(Rect::from_min_max(pos2(10.0, 10.0), pos2(110.0, 110.0)))
    }

    fn press(pos: Pos2, pressed: bool) -> egui::Event {
        egui::Event::PointerButton {
            pos,
            button: PointerButton::Primary,
            pressed,
            modifiers: Modifiers::NONE,
        }
    }

    #[test]
    fn test_press_outside_canvas_is_dropped() {
        let mut handler = handler();
        let events = handler.translate(&[press(pos2(5.0, 5.0), true)]);
        assert!(events.is_empty());

        let events = handler.translate(&[press(pos2(50.0, 50.0), true)]);
        assert_eq!(events, vec![InputEvent::PointerDown { position: pos2(50.0, 50.0) }]);
    }

    #[test]
    fn test_leaving_canvas_emits_leave() {
        let mut handler = handler();
        let events = handler.translate(&[
            egui::Event::PointerMoved(pos2(50.0, 50.0)),
            egui::Event::PointerMoved(pos2(200.0, 50.0)),
            egui::Event::PointerMoved(pos2(300.0, 50.0)),
        ]);
        assert_eq!(
            events,
            vec![
                InputEvent::PointerMove { position: pos2(50.0, 50.0) },
                InputEvent::PointerLeave { position: pos2(50.0, 50.0) },
            ]
        );
    }

    #[test]
    fn test_touch_phases() {
        let mut handler = handler();
        let touch = |phase, pos| egui::Event::Touch {
            device_id: TouchDeviceId(0),
            id: TouchId(7),
            phase,
            pos,
            force: None,
        };
        let events = handler.translate(&[
            touch(TouchPhase::Start, pos2(20.0, 20.0)),
            touch(TouchPhase::Move, pos2(25.0, 20.0)),
            touch(TouchPhase::End, pos2(25.0, 20.0)),
        ]);
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].touch_id(), Some(7));
        assert!(matches!(events[2], InputEvent::TouchEnd { id: 7, .. }));
    }
}
