#![no_main]

use arbitrary::Arbitrary;
use dockwright_layout::{
    ContainerId, Dock, DockConfig, DockNode, DockableId, DragKeyGenerator, LayoutId, Point,
    PointerButton, Rect, Side,
};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum FuzzTarget {
    Root,
    Leaf(u8),
    Split(u8),
}

#[derive(Debug, Arbitrary)]
enum FuzzOp {
    DockTo { dockable: u8, target: FuzzTarget, side: u8 },
    Stack { dockable: u8, container: u8, index: u8 },
    Close { dockable: u8 },
    ToggleMaximize { container: u8 },
    Divider { layout: u8, position: f32 },
    Drag { from: (u16, u16), to: (i16, i16) },
    Drop { dockable: u8, at: (u16, u16) },
    Resize { width: u16, height: u16 },
}

fn side(raw: u8) -> Side {
    Side::ALL[usize::from(raw) % Side::ALL.len()]
}

fn container(raw: u8) -> ContainerId {
    ContainerId::new(u64::from(raw) % 16 + 1).unwrap_or(ContainerId::MIN)
}

fn point((x, y): (u16, u16)) -> Point {
    Point::new(f32::from(x % 2048), f32::from(y % 2048))
}

fuzz_target!(|ops: Vec<FuzzOp>| {
    let keys = DragKeyGenerator::new();
    let Ok(mut dock) = Dock::<dockwright_layout::TabGroup, ()>::new(DockConfig::default(), &keys, ())
    else {
        return;
    };
    dock.layout(Rect::new(0.0, 0.0, 800.0, 600.0));

    for op in ops.into_iter().take(256) {
        match op {
            FuzzOp::DockTo {
                dockable,
                target,
                side: raw_side,
            } => {
                let target = match target {
                    FuzzTarget::Root => None,
                    FuzzTarget::Leaf(raw) => Some(DockNode::Leaf(container(raw))),
                    FuzzTarget::Split(raw) => {
                        LayoutId::new(u64::from(raw) % 16 + 1).map(DockNode::Split)
                    }
                };
                let _ = dock.dock_to(DockableId::new(u64::from(dockable % 24)), target, side(raw_side));
            }
            FuzzOp::Stack {
                dockable,
                container: raw,
                index,
            } => {
                let _ = dock.stack(
                    DockableId::new(u64::from(dockable % 24)),
                    container(raw),
                    Some(usize::from(index)),
                );
            }
            FuzzOp::Close { dockable } => {
                let _ = dock.close(DockableId::new(u64::from(dockable % 24)));
            }
            FuzzOp::ToggleMaximize { container: raw } => {
                let _ = dock.toggle_maximize(container(raw));
            }
            FuzzOp::Divider { layout, position } => {
                if let Some(layout) = LayoutId::new(u64::from(layout) % 16 + 1) {
                    let _ = dock.set_divider_position(layout, position);
                }
            }
            FuzzOp::Drag { from, to } => {
                if dock.mouse_down(point(from), PointerButton::Primary) {
                    let end = Point::new(f32::from(to.0), f32::from(to.1));
                    let _ = dock.mouse_drag(end);
                    let _ = dock.mouse_up(end);
                }
            }
            FuzzOp::Drop { dockable, at } => {
                if let Some(payload) = dock.drag_payload(DockableId::new(u64::from(dockable % 24))) {
                    let _ = dock.data_drop(point(at), &payload);
                }
            }
            FuzzOp::Resize { width, height } => {
                dock.layout(Rect::new(0.0, 0.0, f32::from(width), f32::from(height)));
            }
        }

        // Post-conditions that must always hold:
        if let Err(err) = dock.validate() {
            panic!("dock invariants violated: {err}\n{}", dock.tree());
        }
        for (id, group) in dock.containers() {
            let frame = dockwright_layout::DockLayoutNode::frame_rect(group);
            assert!(frame.width >= 0.0 && frame.height >= 0.0, "negative extent on {id:?}");
        }
    }
});
