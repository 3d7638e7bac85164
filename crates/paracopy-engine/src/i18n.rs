//! UI strings for the affordance and host notifications.

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Locale {
    #[default]
    En,
    Zh,
}

impl Locale {
    /// Resolve a language tag such as `zh-CN` or `en-GB`. Unknown tags fall back to English.
    pub fn from_tag(tag: &str) -> Self {
        if tag.trim().to_ascii_lowercase().starts_with("zh") {
            Locale::Zh
        } else {
            Locale::En
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    CopyButtonIcon,
    CopyButtonTitle,
    CopyButtonAria,
    CopySuccessIcon,
    CopyFailed,
    InvalidPattern,
    FolderAdded,
    FolderDuplicate,
    SettingsSaved,
}

pub fn text(locale: Locale, message: Message) -> &'static str {
    match locale {
        Locale::En => english(message),
        Locale::Zh => chinese(message),
    }
}

fn english(message: Message) -> &'static str {
    match message {
        Message::CopyButtonIcon => "📋",
        Message::CopyButtonTitle => "Copy Section",
        Message::CopyButtonAria => "Copy content of this section",
        Message::CopySuccessIcon => "✅",
        Message::CopyFailed => "Copy failed",
        Message::InvalidPattern => "Invalid Regex Pattern",
        Message::FolderAdded => "Added: ",
        Message::FolderDuplicate => "Folder already in whitelist",
        Message::SettingsSaved => "Settings saved. Please reload/reopen the note to see changes.",
    }
}

fn chinese(message: Message) -> &'static str {
    match message {
        Message::CopyButtonIcon => "📋",
        Message::CopyButtonTitle => "复制本节",
        Message::CopyButtonAria => "复制本节内容",
        Message::CopySuccessIcon => "✅",
        Message::CopyFailed => "复制失败",
        Message::InvalidPattern => "无效的正则表达式",
        Message::FolderAdded => "已添加: ",
        Message::FolderDuplicate => "文件夹已存在",
        Message::SettingsSaved => "设置已保存，请刷新笔记查看效果",
    }
}
