// Canvas drawing for the page. Called once per animation frame; reads page
// state but never mutates it.

use std::f64::consts::{PI, TAU};

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::layout::{BALLOON_STRING, Hit, PageLayout, Rect, Section, SectionTracker, wrap_words};
use crate::page::BirthdayPage;
use crate::widgets::gifts::{GiftBox, GiftIcon, GiftState};

const PINK: &str = "#FF6B9D";
const PURPLE: &str = "#C77DFF";
const YELLOW: &str = "#FFE66D";
const CORAL: &str = "#FF7F7F";
const LAVENDER: &str = "#F3E8FF";
const SKY: &str = "#DDF1FA";
const PEACH: &str = "#FFEBDA";
const INK: &str = "#4B3B63";

const CANDLE_COLORS: [(&str, &str); 5] = [
    ("#FF6B9D", "#FF8FB3"),
    ("#C77DFF", "#D99EFF"),
    ("#FFE66D", "#FFF099"),
    ("#7DFFBB", "#9EFFD1"),
    ("#87CEEB", "#A8DCEF"),
];

const SCRIPT_FONT: &str = "'Dancing Script', 'Pacifico', cursive";
const BODY_FONT: &str = "'Quicksand', 'Segoe UI', sans-serif";
const NAME_FONT: &str = "'Pacifico', cursive";

pub(crate) struct Frame<'a> {
    pub ctx: &'a CanvasRenderingContext2d,
    pub layout: &'a PageLayout,
    pub page: &'a BirthdayPage,
    pub sections: &'a SectionTracker,
    pub scroll_y: f64,
    pub hover: Option<Hit>,
    pub now_ms: f64,
}

impl Frame<'_> {
    fn secs(&self) -> f64 {
        self.now_ms / 1000.0
    }

    fn s(&self) -> f64 {
        self.layout.scale()
    }
}

pub(crate) fn render(frame: &Frame) {
    let ctx = frame.ctx;
    let l = frame.layout;
    ctx.clear_rect(0.0, 0.0, l.width, l.height);

    let viewport = Rect::new(0.0, frame.scroll_y, l.width, l.height);
    ctx.save();
    ctx.translate(0.0, -frame.scroll_y).ok();
    for section in Section::ALL {
        let rect = l.section_rect(section);
        if !rect.intersects(&viewport) {
            continue;
        }
        draw_section_background(ctx, section, &rect);
        let alpha = frame.sections.reveal_alpha(section, frame.now_ms);
        if alpha <= 0.0 {
            continue;
        }
        ctx.set_global_alpha(alpha);
        match section {
            Section::Hero => draw_hero(frame, &rect),
            Section::Cake => draw_cake(frame, &rect),
            Section::Gifts => draw_gifts(frame, &rect),
            Section::Balloons => draw_balloon_game(frame, &rect),
            Section::Finale => draw_finale(frame, &rect),
        }
        ctx.set_global_alpha(1.0);
    }
    ctx.restore();

    if frame.page.confetti().is_visible() {
        draw_confetti(frame);
    }
    draw_mute_button(frame);
}

// --- Sections ---------------------------------------------------------------

fn draw_section_background(ctx: &CanvasRenderingContext2d, section: Section, r: &Rect) {
    let (top, bottom) = match section {
        Section::Hero => (LAVENDER, "#FFFFFF"),
        Section::Cake => ("#FFFFFF", LAVENDER),
        Section::Gifts => (LAVENDER, "#FFFFFF"),
        Section::Balloons => ("#FFFFFF", SKY),
        Section::Finale => (SKY, PEACH),
    };
    let grad = ctx.create_linear_gradient(0.0, r.y, 0.0, r.bottom());
    grad.add_color_stop(0.0, top).ok();
    grad.add_color_stop(1.0, bottom).ok();
    ctx.set_fill_style(&grad);
    ctx.fill_rect(r.x, r.y, r.w, r.h);
}

fn draw_hero(frame: &Frame, r: &Rect) {
    let ctx = frame.ctx;
    let s = frame.s();
    let t = frame.secs();
    let cx = r.center_x();
    let cy = r.center_y();

    // Floating decorations
    let bob = |period: f64, amp: f64| (t / period * TAU).sin() * amp;
    text(ctx, "★", 40.0 * s, r.y + 80.0 * s + bob(3.0, 15.0), body(32.0 * s, YELLOW).left());
    text(ctx, "♥", r.w - 64.0 * s, r.y + 128.0 * s + bob(2.5, 10.0), body(24.0 * s, PINK).left());
    text(
        ctx,
        "✦",
        80.0 * s,
        r.bottom() - 160.0 * s + bob(4.0, 20.0),
        body(40.0 * s, PURPLE).left(),
    );
    text(
        ctx,
        "✺",
        r.w - 40.0 * s,
        r.bottom() - 128.0 * s,
        body(32.0 * s * (1.0 + bob(2.0, 0.1)), CORAL).right(),
    );

    text(ctx, "Happy Birthday", cx, cy - 90.0 * s, body(30.0 * s, PURPLE));
    let name_size = (96.0 * s).min(r.w / 6.0);
    let grad = ctx.create_linear_gradient(cx - 200.0 * s, 0.0, cx + 200.0 * s, 0.0);
    grad.add_color_stop(0.0, PINK).ok();
    grad.add_color_stop(0.5, PURPLE).ok();
    grad.add_color_stop(1.0, CORAL).ok();
    ctx.set_font(&format!("{name_size:.0}px {NAME_FONT}"));
    ctx.set_text_align("center");
    ctx.set_fill_style(&grad);
    ctx.fill_text(&frame.page.config().recipient, cx, cy + 20.0 * s).ok();

    let beat = 1.0 + (t * TAU).sin().max(0.0) * 0.15;
    text(ctx, "♥", cx - 190.0 * s, cy + 80.0 * s, body(24.0 * s * beat, PINK));
    text(ctx, "♥", cx + 190.0 * s, cy + 80.0 * s, body(24.0 * s * beat, PINK));
    text(ctx, "Tumhara din bahut khaas ho!", cx, cy + 80.0 * s, script(22.0 * s, PURPLE));

    text(ctx, "⌄", cx, r.bottom() - 40.0 * s + bob(1.5, 10.0), body(36.0 * s, "#C77DFF99"));
}

fn draw_cake(frame: &Frame, r: &Rect) {
    let ctx = frame.ctx;
    let s = frame.s();
    let t = frame.secs();
    let cake = frame.page.cake();
    let count = cake.candles().len();

    text(ctx, "Birthday Cake!", r.center_x(), r.y + r.h * 0.14, script(38.0 * s, PURPLE));

    for candle in cake.candles() {
        let mut cr = frame.layout.candle_rect(candle.index, count);
        if frame.hover == Some(Hit::Candle(candle.index)) && !candle.lit {
            cr = grow(&cr, 1.1);
        }
        let (from, to) = CANDLE_COLORS[candle.index % CANDLE_COLORS.len()];
        let stick_w = cr.w * 0.43;
        let stick_h = cr.h * 0.6;
        let sx = cr.center_x() - stick_w / 2.0;
        let sy = cr.bottom() - stick_h;
        let grad = ctx.create_linear_gradient(sx, 0.0, sx + stick_w, 0.0);
        grad.add_color_stop(0.0, from).ok();
        grad.add_color_stop(1.0, to).ok();
        ctx.set_fill_style(&grad);
        ctx.fill_rect(sx, sy, stick_w, stick_h);

        if candle.lit {
            let phase = (t / 0.5 + candle.index as f64 * 0.37) * TAU;
            let (fx, fy) = (1.0 + phase.cos() * 0.08, 1.0 + phase.sin() * 0.1);
            let flame_w = cr.w * 0.3 * fx;
            let flame_h = cr.h * 0.15 * fy;
            let flame_cy = sy - flame_h - 2.0 * s;
            let g = ctx.create_linear_gradient(0.0, flame_cy + flame_h, 0.0, flame_cy - flame_h);
            g.add_color_stop(0.0, "#FF6B00").ok();
            g.add_color_stop(0.6, YELLOW).ok();
            g.add_color_stop(1.0, "#FFFFFF").ok();
            ctx.set_fill_style(&g);
            ctx.begin_path();
            ctx.ellipse(cr.center_x(), flame_cy, flame_w, flame_h, 0.0, 0.0, TAU).ok();
            ctx.fill();
        }
    }

    // Layers stack down from the candle row.
    let row = frame.layout.candle_rect(0, count.max(1));
    let mut y = row.bottom();
    let layers: [(f64, f64, &str, &str); 3] = [
        (192.0, 64.0, PINK, "#FF8FB3"),
        (224.0, 56.0, PURPLE, "#D99EFF"),
        (256.0, 64.0, YELLOW, "#FFF099"),
    ];
    for (w, h, from, to) in layers {
        let (w, h) = (w * s, h * s);
        let x = r.center_x() - w / 2.0;
        let g = ctx.create_linear_gradient(x, y, x + w, y + h);
        g.add_color_stop(0.0, from).ok();
        g.add_color_stop(1.0, to).ok();
        ctx.set_fill_style(&g);
        rounded_rect(ctx, &Rect::new(x, y, w, h), 10.0 * s);
        ctx.fill();
        y += h;
    }
    ctx.set_fill_style(&JsValue::from_str("#ECECEC"));
    let plate = Rect::new(r.center_x() - 144.0 * s, y + 4.0 * s, 288.0 * s, 16.0 * s);
    rounded_rect(ctx, &plate, 8.0 * s);
    ctx.fill();

    let msg_y = y + 70.0 * s;
    if cake.wish_revealed() {
        text(ctx, "Ab aankhen band karo...", r.center_x(), msg_y, script(30.0 * s, PINK));
        let glow = 0.7 + (t * TAU * 0.5).sin().abs() * 0.3;
        ctx.set_global_alpha(glow);
        text(ctx, "Aur wish karo!", r.center_x(), msg_y + 38.0 * s, script(26.0 * s, PURPLE));
        ctx.set_global_alpha(1.0);
    } else {
        text(
            ctx,
            "Candles par click karo unhe jalane ke liye!",
            r.center_x(),
            msg_y,
            body(18.0 * s, PURPLE),
        );
    }
}

fn draw_gifts(frame: &Frame, r: &Rect) {
    let ctx = frame.ctx;
    let s = frame.s();
    text(ctx, "Surprise Gifts!", r.center_x(), r.y + r.h * 0.14, script(38.0 * s, PINK));
    text(
        ctx,
        "Har gift mein ek special message hai tumhare liye!",
        r.center_x(),
        r.y + r.h * 0.14 + 40.0 * s,
        body(16.0 * s, "#C77DFFB3"),
    );
    let gifts = frame.page.gifts().gifts();
    for (slot, gift) in gifts.iter().enumerate() {
        let mut gr = frame.layout.gift_rect(slot, gifts.len());
        if gift.state == GiftState::Closed && frame.hover == Some(Hit::Gift(gift.id())) {
            gr = grow(&gr, 1.05);
            gr.y -= 8.0 * s;
        }
        if gift.state == GiftState::Opening {
            gr.x += (frame.secs() * TAU * 8.0).sin() * 6.0 * s;
        }
        if gift.opened() {
            draw_open_gift(frame, gift, &gr);
        } else {
            draw_closed_gift(frame, gift, &gr);
        }
    }
}

fn draw_closed_gift(frame: &Frame, gift: &GiftBox, r: &Rect) {
    let ctx = frame.ctx;
    let s = frame.s();
    ctx.save();
    rounded_rect(ctx, r, 14.0 * s);
    ctx.set_fill_style(&JsValue::from_str(gift.spec.color));
    ctx.fill();
    ctx.clip();
    let ribbon = JsValue::from_str(gift.spec.ribbon_color);
    ctx.set_fill_style(&ribbon);
    let band = 24.0 * s;
    ctx.fill_rect(r.center_x() - band / 2.0, r.y, band, r.h);
    ctx.fill_rect(r.x, r.center_y() - band / 2.0, r.w, band);
    // Bow
    let (bx, by) = (r.center_x(), r.center_y());
    for dir in [-1.0, 1.0] {
        ctx.begin_path();
        let (lx, ly) = (bx + dir * 20.0 * s, by - 4.0 * s);
        ctx.ellipse(lx, ly, 16.0 * s, 12.0 * s, dir * -PI / 6.0, 0.0, TAU).ok();
        ctx.fill();
    }
    ctx.begin_path();
    ctx.arc(bx, by, 12.0 * s, 0.0, TAU).ok();
    ctx.fill();
    text(ctx, "Click to open!", r.center_x(), r.bottom() - 18.0 * s, body(14.0 * s, "#FFFFFFCC"));
    ctx.restore();
}

fn draw_open_gift(frame: &Frame, gift: &GiftBox, r: &Rect) {
    let ctx = frame.ctx;
    let s = frame.s();
    let g = ctx.create_linear_gradient(r.x, r.y, r.x + r.w, r.bottom());
    g.add_color_stop(0.0, "#FFFFFF").ok();
    g.add_color_stop(1.0, LAVENDER).ok();
    ctx.set_fill_style(&g);
    rounded_rect(ctx, r, 14.0 * s);
    ctx.fill();

    let (glyph, color) = match gift.spec.icon {
        GiftIcon::Heart => ("♥", PINK),
        GiftIcon::Star => ("★", YELLOW),
        GiftIcon::Sparkle => ("✦", PURPLE),
        GiftIcon::Generic => ("🎁", INK),
    };
    text(ctx, glyph, r.center_x(), r.y + r.h * 0.3, body(36.0 * s, color));
    let font_px = 15.0 * s;
    let max_chars = ((r.w - 24.0 * s) / (font_px * 0.55)).floor() as usize;
    for (i, line) in wrap_words(gift.spec.message, max_chars).iter().enumerate() {
        let y = r.y + r.h * 0.5 + i as f64 * font_px * 1.4;
        text(ctx, line, r.center_x(), y, body(font_px, "#374151"));
    }
}

fn draw_balloon_game(frame: &Frame, r: &Rect) {
    let ctx = frame.ctx;
    let s = frame.s();
    let game = frame.page.balloons();
    let arena = frame.layout.balloon_arena();
    text(ctx, "Balloon Pop!", r.center_x(), r.y + r.h * 0.08, script(38.0 * s, PURPLE));
    text(
        ctx,
        "Saare balloons phodne ki koshish karo!",
        r.center_x(),
        r.y + r.h * 0.08 + 38.0 * s,
        body(16.0 * s, "#C77DFFB3"),
    );

    ctx.save();
    rounded_rect(ctx, &arena, 16.0 * s);
    let g = ctx.create_linear_gradient(0.0, arena.y, 0.0, arena.bottom());
    g.add_color_stop(0.0, "#87CEEB4D").ok();
    g.add_color_stop(1.0, "#E6D5FF4D").ok();
    ctx.set_fill_style(&g);
    ctx.fill();
    ctx.clip();

    if !game.is_started() {
        text(ctx, "🎉", arena.center_x(), arena.center_y() - 50.0 * s, body(56.0 * s, PINK));
        text(ctx, "Balloon Pop Game!", arena.center_x(), arena.center_y(), body(22.0 * s, PURPLE));
        draw_button(frame, "Shuru Karo!", PINK);
        ctx.restore();
        return;
    }

    let elapsed = game.elapsed_secs(frame.now_ms);
    for b in game.balloons().iter().filter(|b| !b.popped && !b.escaped(elapsed)) {
        let mut br = frame.layout.balloon_rect(b, elapsed);
        if frame.hover == Some(Hit::Balloon(b.id)) {
            br = grow(&br, 1.1);
        }
        let body_h = br.h - BALLOON_STRING * (br.w / b.size);
        let color = JsValue::from_str(b.color.hex());
        ctx.set_fill_style(&color);
        ctx.begin_path();
        let (rx, ry) = (br.w / 2.0, body_h / 2.0);
        ctx.ellipse(br.center_x(), br.y + ry, rx, ry, 0.0, 0.0, TAU).ok();
        ctx.fill();
        ctx.set_fill_style(&JsValue::from_str("rgba(255,255,255,0.4)"));
        ctx.begin_path();
        ctx.arc(br.x + br.w * 0.3, br.y + body_h * 0.25, 6.0, 0.0, TAU).ok();
        ctx.fill();
        ctx.set_stroke_style(&color);
        ctx.set_line_width(2.0);
        ctx.begin_path();
        ctx.move_to(br.center_x(), br.y + body_h);
        ctx.line_to(br.center_x(), br.bottom());
        ctx.stroke();
    }

    // Score pill
    let pill = Rect::new(arena.x + 16.0, arena.y + 16.0, 120.0 * s, 36.0 * s);
    ctx.set_fill_style(&JsValue::from_str("rgba(255,255,255,0.8)"));
    rounded_rect(ctx, &pill, pill.h / 2.0);
    ctx.fill();
    text(
        ctx,
        &format!("Score: {}", game.score()),
        pill.center_x(),
        pill.center_y() + 6.0 * s,
        body(16.0 * s, PURPLE),
    );

    if game.is_complete() || game.is_round_over(frame.now_ms) {
        ctx.set_fill_style(&JsValue::from_str("rgba(255,255,255,0.5)"));
        ctx.fill_rect(arena.x, arena.y, arena.w, arena.h);
        let (title, line) = if game.is_complete() {
            ("Bahut Badiya!", "Tumne saare balloons phodd diye!".to_string())
        } else {
            let escaped = game.escaped_count(frame.now_ms);
            ("Arre!", format!("{escaped} balloons ud gaye!"))
        };
        text(ctx, "✨", arena.center_x(), arena.center_y() - 90.0 * s, body(44.0 * s, YELLOW));
        text(ctx, title, arena.center_x(), arena.center_y() - 40.0 * s, body(26.0 * s, PURPLE));
        text(ctx, &line, arena.center_x(), arena.center_y() - 8.0 * s, body(18.0 * s, PINK));
        draw_button(frame, "Phir Se Khelo!", PURPLE);
    }
    ctx.restore();
}

fn draw_button(frame: &Frame, label: &str, color: &str) {
    let ctx = frame.ctx;
    let s = frame.s();
    let mut b = frame.layout.game_button();
    if frame.hover == Some(Hit::StartGame) {
        b = grow(&b, 1.05);
    }
    ctx.set_fill_style(&JsValue::from_str(color));
    rounded_rect(ctx, &b, b.h / 2.0);
    ctx.fill();
    text(ctx, label, b.center_x(), b.center_y() + 6.0 * s, body(18.0 * s, "#FFFFFF"));
}

fn draw_finale(frame: &Frame, r: &Rect) {
    let ctx = frame.ctx;
    let s = frame.s();
    let t = frame.secs();
    let cx = r.center_x();

    // Slow spinning star, pulsing heart, bobbing sparkle
    ctx.save();
    ctx.translate(r.w * 0.1, r.y + 80.0 * s).ok();
    ctx.rotate((t / 20.0).fract() * TAU).ok();
    text(ctx, "★", 0.0, 8.0 * s, body(24.0 * s, YELLOW));
    ctx.restore();
    let pulse = 1.0 + (t / 2.0 * TAU).sin().abs() * 0.3;
    text(ctx, "♥", r.w * 0.85, r.y + 160.0 * s, body(32.0 * s * pulse, PINK));
    text(
        ctx,
        "✦",
        r.w * 0.2,
        r.bottom() - 160.0 * s + (t / 3.0 * TAU).sin() * 15.0,
        body(32.0 * s, PURPLE),
    );

    let top = r.y + r.h * 0.2;
    let beat = 1.0 + (t / 2.0 * TAU).sin().abs() * 0.1;
    text(ctx, "♥", cx, top, body(64.0 * s * beat, PINK));
    text(ctx, &frame.page.config().recipient, cx, top + 100.0 * s, name(56.0 * s, PURPLE));
    let lines = [
        ("Tumhara ye special din bahut khaas ho!", "#374151"),
        ("Dher saari khushiyan, pyaar aur masti!", "#374151"),
        ("Bahut saara pyaar tumhare liye!", PINK),
    ];
    for (i, &(line, color)) in lines.iter().enumerate() {
        text(ctx, line, cx, top + 160.0 * s + i as f64 * 32.0 * s, body(20.0 * s, color));
    }
    for i in 0..5 {
        let hop = ((t - i as f64 * 0.1) * TAU).sin().max(0.0) * 10.0;
        let x = cx + (i as f64 - 2.0) * 36.0 * s;
        text(ctx, "★", x, top + 290.0 * s - hop, body(24.0 * s, YELLOW));
    }
    text(ctx, "Happy Birthday!", cx, top + 350.0 * s, script(32.0 * s, CORAL));

    let footer = format!("Made with ♥ for {}", frame.page.config().recipient);
    text(ctx, &footer, cx, r.bottom() - 24.0 * s, body(14.0 * s, "#C77DFF99"));
}

// --- Overlays ---------------------------------------------------------------

fn draw_confetti(frame: &Frame) {
    let ctx = frame.ctx;
    let l = frame.layout;
    for (p, f) in frame.page.confetti().particles_at(frame.now_ms) {
        let x = f.x_pct / 100.0 * l.width;
        let y = -120.0 + f.fall * (l.height + 100.0);
        ctx.save();
        ctx.set_global_alpha(f.opacity);
        ctx.translate(x + p.size / 2.0, y + p.size / 2.0).ok();
        ctx.rotate(f.rotation_deg.to_radians()).ok();
        ctx.set_fill_style(&JsValue::from_str(p.color.hex()));
        if p.round {
            ctx.begin_path();
            ctx.arc(0.0, 0.0, p.size / 2.0, 0.0, TAU).ok();
            ctx.fill();
        } else {
            ctx.fill_rect(-p.size / 2.0, -p.size / 2.0, p.size, p.size);
        }
        ctx.restore();
    }
}

fn draw_mute_button(frame: &Frame) {
    let ctx = frame.ctx;
    let b = frame.layout.mute_button();
    ctx.set_fill_style(&JsValue::from_str("rgba(255,255,255,0.8)"));
    ctx.begin_path();
    ctx.arc(b.center_x(), b.center_y(), b.w / 2.0, 0.0, TAU).ok();
    ctx.fill();
    let glyph = if frame.page.is_muted() { "🔇" } else { "🎵" };
    text(ctx, glyph, b.center_x(), b.center_y() + 7.0, body(20.0, PURPLE));
}

// --- Helpers ----------------------------------------------------------------

#[derive(Clone, Copy)]
struct Style {
    px: f64,
    family: &'static str,
    color: &'static str,
    align: &'static str,
}

impl Style {
    fn left(self) -> Self {
        Self { align: "left", ..self }
    }

    fn right(self) -> Self {
        Self { align: "right", ..self }
    }
}

fn body(px: f64, color: &'static str) -> Style {
    Style { px, family: BODY_FONT, color, align: "center" }
}

fn script(px: f64, color: &'static str) -> Style {
    Style { px, family: SCRIPT_FONT, color, align: "center" }
}

fn name(px: f64, color: &'static str) -> Style {
    Style { px, family: NAME_FONT, color, align: "center" }
}

fn text(ctx: &CanvasRenderingContext2d, s: &str, x: f64, y: f64, style: Style) {
    ctx.set_font(&format!("{:.0}px {}", style.px, style.family));
    ctx.set_text_align(style.align);
    ctx.set_fill_style(&JsValue::from_str(style.color));
    ctx.fill_text(s, x, y).ok();
}

fn rounded_rect(ctx: &CanvasRenderingContext2d, r: &Rect, radius: f64) {
    let rad = radius.min(r.w / 2.0).min(r.h / 2.0);
    ctx.begin_path();
    ctx.move_to(r.x + rad, r.y);
    ctx.arc_to(r.x + r.w, r.y, r.x + r.w, r.bottom(), rad).ok();
    ctx.arc_to(r.x + r.w, r.bottom(), r.x, r.bottom(), rad).ok();
    ctx.arc_to(r.x, r.bottom(), r.x, r.y, rad).ok();
    ctx.arc_to(r.x, r.y, r.x + r.w, r.y, rad).ok();
    ctx.close_path();
}

fn grow(r: &Rect, factor: f64) -> Rect {
    let (w, h) = (r.w * factor, r.h * factor);
    Rect::new(r.center_x() - w / 2.0, r.center_y() - h / 2.0, w, h)
}
