//! User-facing message texts.

pub const GREETING: &str = "🇺🇦 Слава Україні 🇺🇦, козаче (берегине)! \n\
    Надішли, будь ласка, мені світлину в форматі PNG, \"як файл\". \n\
    Ти можеш скористатись Segment Anything для вирізання об'єктів на фото: https://segment-anything.com/demo";

pub const GOODBYE: &str = "Бувай, козаче (берегине)! Не забувай донатити на ЗСУ!";

pub const BLACKLISTED: &str = "🇺🇦🇺🇦🇺🇦 Слава Україні! 🇺🇦🇺🇦🇺🇦\nТобі тут не раді...";

pub const SEND_AS_FILE: &str = "Надішли, будь ласка, картинку \"як файл\" - звичайні картинки не зберігають прозорий фон 🤓";

pub const NO_IMAGE: &str = "Не бачу картинки - надішли, будь ласка, її \"як файл\"";

pub const NO_IMAGE_EMOJI: &str = "🙈";

pub const WORKING: &str = "Працюю... ⌛";

pub const FETCH_FAILED: &str = "Не вдалося завантажити файл з Telegram, спробуй ще раз 🙏";

pub const PROCESSING_FAILED: &str = "Не вдалося обробити картинку. Перевір, що це PNG або WebP з прозорим фоном 🧐";

pub const PING: &str = "ping";

pub const PONG: &str = "pong";

/// Stem of the file name the sticker is sent under.
pub const STICKER_FILE_STEM: &str = "bot_sticker";
