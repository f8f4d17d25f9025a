//! Browser shell: canvas setup, input listeners and the animation loop.
//!
//! The page lives in a thread-local slot. The frame loop and every listener
//! look the page up on each call, so `stop()` emptying the slot is enough to
//! silence them and to stop pending timers from firing.

pub mod layout;
mod render;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::{debug, info};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, Window, window};

use crate::config::PageConfig;
use crate::error::{PageError, Result};
use crate::logging;
use crate::page::{BirthdayPage, Notice, entropy_rng};
use layout::{Hit, PageLayout, SectionTracker, relayout};

const CANVAS_ID: &str = "bp-canvas";
const SPACER_ID: &str = "bp-spacer";
const WIRED_ATTR: &str = "data-bp-wired";

struct PageState {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    spacer: HtmlElement,
    // Elements the host page supplied are left in place on stop.
    owns_canvas: bool,
    owns_spacer: bool,
    page: BirthdayPage,
    layout: PageLayout,
    sections: SectionTracker,
    scroll_y: f64,
    hover: Option<Hit>,
}

thread_local! {
    static PAGE_STATE: RefCell<Option<PageState>> = const { RefCell::new(None) };
    static WINDOW_LISTENERS: Cell<bool> = const { Cell::new(false) };
    static LOOP_GENERATION: Cell<u64> = const { Cell::new(0) };
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn now_ms() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

fn viewport(win: &Window) -> (f64, f64) {
    let w = win.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(1024.0);
    let h = win.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(768.0);
    (w, h)
}

/// Mount the page, replacing any page already running.
pub fn start(config: PageConfig) -> Result<()> {
    if stop() {
        debug!("restarting page");
    }
    logging::init(&config.log_level);

    let win = window().ok_or(PageError::NoWindow)?;
    let doc = win.document().ok_or(PageError::NoDocument)?;
    let body = doc.body().ok_or(PageError::NoBody)?;
    let (w, h) = viewport(&win);
    let layout = PageLayout::new(w, h);

    // Canvas stays fixed over the viewport; the spacer gives the document its
    // scroll height.
    let (canvas, owns_canvas): (HtmlCanvasElement, bool) = match doc.get_element_by_id(CANVAS_ID) {
        Some(el) => {
            let c = el
                .dyn_into()
                .map_err(|_| PageError::Dom(format!("#{CANVAS_ID} is not a canvas")))?;
            (c, false)
        }
        None => {
            let c: HtmlCanvasElement = doc
                .create_element("canvas")?
                .dyn_into()
                .map_err(|_| PageError::NoContext)?;
            c.set_id(CANVAS_ID);
            c.set_attribute("style", "position:fixed; left:0; top:0; z-index:10;")?;
            body.append_child(&c)?;
            (c, true)
        }
    };
    canvas.set_width(w as u32);
    canvas.set_height(h as u32);
    let (spacer, owns_spacer): (HtmlElement, bool) = match doc.get_element_by_id(SPACER_ID) {
        Some(el) => {
            let s = el
                .dyn_into()
                .map_err(|_| PageError::Dom(format!("#{SPACER_ID} is not an element")))?;
            (s, false)
        }
        None => {
            let s: HtmlElement = doc
                .create_element("div")?
                .dyn_into()
                .map_err(|_| PageError::NoBody)?;
            s.set_id(SPACER_ID);
            body.append_child(&s)?;
            (s, true)
        }
    };
    size_spacer(&spacer, &layout)?;

    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or(PageError::NoContext)?
        .dyn_into()
        .map_err(|_| PageError::NoContext)?;

    let now = now_ms();
    let scroll_y = win.scroll_y().unwrap_or(0.0);
    let mut sections = SectionTracker::new(now);
    sections.observe(&layout, scroll_y, now);
    let page = BirthdayPage::new(config, entropy_rng(), now);
    info!(width = w, height = h, "page started");

    PAGE_STATE.with(|slot| {
        slot.replace(Some(PageState {
            canvas: canvas.clone(),
            ctx,
            spacer,
            owns_canvas,
            owns_spacer,
            page,
            layout,
            sections,
            scroll_y,
            hover: None,
        }))
    });

    // A host-supplied canvas keeps its listeners across restarts.
    if !canvas.has_attribute(WIRED_ATTR) {
        install_canvas_listeners(&canvas)?;
        canvas.set_attribute(WIRED_ATTR, "")?;
    }
    if !WINDOW_LISTENERS.with(Cell::get) {
        install_window_listeners(&win)?;
        WINDOW_LISTENERS.with(|flag| flag.set(true));
    }
    start_frame_loop();
    Ok(())
}

/// Tear down the running page. Returns false if nothing was running.
///
/// The canvas and spacer are removed only if `start` created them; a
/// host-supplied `#bp-canvas` is cleared and kept.
pub fn stop() -> bool {
    let Some(mut state) = PAGE_STATE.with(|slot| slot.borrow_mut().take()) else {
        return false;
    };
    state.page.teardown();
    if state.owns_canvas {
        state.canvas.remove();
    } else {
        state.ctx.clear_rect(0.0, 0.0, state.layout.width, state.layout.height);
        state.canvas.style().remove_property("cursor").ok();
    }
    if state.owns_spacer {
        state.spacer.remove();
    }
    true
}

/// Run `f` against the live page with the current timestamp.
pub fn with_page<R>(f: impl FnOnce(&mut BirthdayPage, f64) -> R) -> Result<R> {
    let now = now_ms();
    PAGE_STATE.with(|slot| match slot.borrow_mut().as_mut() {
        Some(state) => Ok(f(&mut state.page, now)),
        None => Err(PageError::NotStarted),
    })
}

fn size_spacer(spacer: &HtmlElement, layout: &PageLayout) -> Result<()> {
    spacer.set_attribute(
        "style",
        &format!("width:1px; height:{:.0}px; pointer-events:none;", layout.page_height()),
    )?;
    Ok(())
}

fn dispatch(state: &mut PageState, hit: Hit, now: f64) {
    let page = &mut state.page;
    match hit {
        Hit::Mute => {
            let muted = page.toggle_mute();
            debug!(muted, "mute toggled");
        }
        Hit::Candle(i) => {
            page.light_candle(i, now);
        }
        Hit::Gift(id) => {
            page.open_gift(id, now);
        }
        Hit::StartGame => page.start_balloon_game(now),
        Hit::Balloon(id) => {
            page.pop_balloon(id, now);
        }
    }
}

fn install_canvas_listeners(canvas: &HtmlCanvasElement) -> Result<()> {
    // Click: resolve against the layout in page space, then act.
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::MouseEvent| {
            let (vx, vy) = (evt.offset_x() as f64, evt.offset_y() as f64);
            let now = now_ms();
            PAGE_STATE.with(|cell| {
                let mut slot = cell.borrow_mut();
                let Some(st) = slot.as_mut() else { return };
                let page_pt = (vx, vy + st.scroll_y);
                if let Some(hit) = st.layout.hit_test(&st.page, page_pt, (vx, vy), now) {
                    debug!(?hit, "click");
                    dispatch(st, hit, now);
                }
            });
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Hover drives the pointer cursor and hover scaling.
    {
        let canvas_move = canvas.clone();
        let closure = Closure::wrap(Box::new(move |evt: web_sys::MouseEvent| {
            let (vx, vy) = (evt.offset_x() as f64, evt.offset_y() as f64);
            let now = now_ms();
            PAGE_STATE.with(|cell| {
                if let Some(st) = cell.borrow_mut().as_mut() {
                    let page_pt = (vx, vy + st.scroll_y);
                    st.hover = st.layout.hit_test(&st.page, page_pt, (vx, vy), now);
                    let cursor = if st.hover.is_some() { "pointer" } else { "default" };
                    canvas_move.style().set_property("cursor", cursor).ok();
                }
            });
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
            PAGE_STATE.with(|cell| {
                if let Some(st) = cell.borrow_mut().as_mut() {
                    st.hover = None;
                }
            });
        }) as Box<dyn FnMut(_)>);
        canvas.add_event_listener_with_callback("mouseleave", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    Ok(())
}

// Window listeners outlive any single page and are installed once.
fn install_window_listeners(win: &Window) -> Result<()> {
    // Scroll reveals sections.
    {
        let win_scroll = win.clone();
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
            let scroll_y = win_scroll.scroll_y().unwrap_or(0.0);
            let now = now_ms();
            PAGE_STATE.with(|cell| {
                if let Some(st) = cell.borrow_mut().as_mut() {
                    st.scroll_y = scroll_y;
                    for section in st.sections.observe(&st.layout, scroll_y, now) {
                        debug!(?section, "section revealed");
                    }
                }
            });
        }) as Box<dyn FnMut(_)>);
        win.add_event_listener_with_callback("scroll", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Resize: new canvas size, new layout, and reveal whatever the old
    // scroll offset now shows.
    {
        let win_resize = win.clone();
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::Event| {
            let (w, h) = viewport(&win_resize);
            let scroll_y = win_resize.scroll_y().unwrap_or(0.0);
            let now = now_ms();
            PAGE_STATE.with(|cell| {
                if let Some(st) = cell.borrow_mut().as_mut() {
                    let (layout, fresh) = relayout(&mut st.sections, w, h, scroll_y, now);
                    for section in fresh {
                        debug!(?section, "section revealed");
                    }
                    st.layout = layout;
                    st.scroll_y = scroll_y;
                    st.canvas.set_width(w as u32);
                    st.canvas.set_height(h as u32);
                    size_spacer(&st.spacer, &st.layout).ok();
                }
            });
        }) as Box<dyn FnMut(_)>);
        win.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }
    Ok(())
}

/// Each start bumps the loop generation; a loop left over from an earlier
/// page sees the mismatch and stops requesting frames.
fn start_frame_loop() {
    let generation = LOOP_GENERATION.with(|g| {
        g.set(g.get() + 1);
        g.get()
    });
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        if LOOP_GENERATION.with(Cell::get) != generation {
            return;
        }
        let running = PAGE_STATE.with(|cell| match cell.borrow_mut().as_mut() {
            Some(state) => {
                frame_tick(state, ts);
                true
            }
            None => false,
        });
        if !running {
            return;
        }
        if let (Some(w), Some(cb)) = (window(), f.borrow().as_ref()) {
            let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64)>));
    if let (Some(w), Some(cb)) = (window(), g.borrow().as_ref()) {
        let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

fn frame_tick(state: &mut PageState, now: f64) {
    for notice in state.page.tick(now) {
        match notice {
            Notice::WishRevealed => info!("all candles lit, wish revealed"),
            Notice::GiftOpened { gift } => info!(gift, "gift opened"),
            Notice::BalloonPopped { balloon, score } => debug!(balloon, score, "balloon popped"),
            Notice::GameComplete { score } => info!(score, "every balloon popped"),
            Notice::ConfettiHidden => debug!("confetti window closed"),
        }
    }
    render::render(&render::Frame {
        ctx: &state.ctx,
        layout: &state.layout,
        page: &state.page,
        sections: &state.sections,
        scroll_y: state.scroll_y,
        hover: state.hover,
        now_ms: now,
    });
}
