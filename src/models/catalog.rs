use serde::Serialize;

use super::options::Lang;

/// Display text in every supported language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Label {
    pub en: &'static str,
    pub zh: &'static str,
}

impl Label {
    pub const fn new(en: &'static str, zh: &'static str) -> Self {
        Self { en, zh }
    }

    pub fn get(&self, lang: Lang) -> &'static str {
        match lang {
            Lang::En => self.en,
            Lang::Zh => self.zh,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogOption {
    pub value: &'static str,
    pub label: Label,
}

impl CatalogOption {
    /// The leading "none" entry every category carries.
    pub fn is_placeholder(&self) -> bool {
        self.value.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Category {
    pub id: &'static str,
    pub name: Label,
    pub options: &'static [CatalogOption],
}

impl Category {
    pub fn option(&self, value: &str) -> Option<&'static CatalogOption> {
        self.options.iter().find(|o| o.value == value)
    }

    pub fn selectable(&self) -> impl Iterator<Item = &'static CatalogOption> {
        self.options.iter().filter(|o| !o.is_placeholder())
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ControlGroup {
    pub id: &'static str,
    pub name: Label,
    pub controls: &'static [Category],
}

pub const GROUP_CHARACTER: &str = "character";
pub const GROUP_ENVIRONMENT: &str = "environment";
pub const GROUP_STYLE: &str = "style";
pub const GROUP_PHOTOGRAPHY: &str = "photography";

pub const CATEGORY_AGE: &str = "age";
pub const CATEGORY_GENDER: &str = "gender";
pub const CATEGORY_NATIONALITY: &str = "nationality";
pub const CATEGORY_SHOT_TYPE: &str = "shot_type";
pub const CATEGORY_POSE: &str = "pose";

const NONE: CatalogOption = opt("", "None", "无");

const fn opt(value: &'static str, en: &'static str, zh: &'static str) -> CatalogOption {
    CatalogOption {
        value,
        label: Label::new(en, zh),
    }
}

pub static CONTROL_GROUPS: &[ControlGroup] = &[
    ControlGroup {
        id: GROUP_CHARACTER,
        name: Label::new("Character", "人物"),
        controls: &[
            Category {
                id: CATEGORY_GENDER,
                name: Label::new("Gender", "性别"),
                options: &[
                    NONE,
                    opt("female", "female", "女性"),
                    opt("male", "male", "男性"),
                    opt("androgynous", "androgynous person", "中性"),
                ],
            },
            Category {
                id: CATEGORY_AGE,
                name: Label::new("Age", "年龄"),
                options: &[
                    NONE,
                    opt("child", "child", "儿童"),
                    opt("teen", "teenage", "青少年"),
                    opt("20s", "20s", "20多岁"),
                    opt("30s", "30s", "30多岁"),
                    opt("40s", "40s", "40多岁"),
                    opt("50s", "50s", "50多岁"),
                    opt("elderly", "elderly", "老年"),
                ],
            },
            Category {
                id: CATEGORY_NATIONALITY,
                name: Label::new("Nationality", "国籍"),
                options: &[
                    NONE,
                    opt("chinese", "Chinese", "中国"),
                    opt("japanese", "Japanese", "日本"),
                    opt("korean", "Korean", "韩国"),
                    opt("french", "French", "法国"),
                    opt("italian", "Italian", "意大利"),
                    opt("american", "American", "美国"),
                    opt("brazilian", "Brazilian", "巴西"),
                    opt("nigerian", "Nigerian", "尼日利亚"),
                    opt("indian", "Indian", "印度"),
                ],
            },
            Category {
                id: "hairstyle",
                name: Label::new("Hairstyle", "发型"),
                options: &[
                    NONE,
                    opt("long_straight", "long straight hair", "黑长直"),
                    opt("wavy_bob", "wavy bob", "波浪短发"),
                    opt("pixie", "pixie cut", "精灵短发"),
                    opt("braids", "braided hair", "编发"),
                    opt("bun", "messy bun", "丸子头"),
                    opt("buzz", "buzz cut", "寸头"),
                ],
            },
            Category {
                id: "expression",
                name: Label::new("Expression", "表情"),
                options: &[
                    NONE,
                    opt("smile", "gentle smile", "微笑"),
                    opt("laugh", "laughing", "大笑"),
                    opt("serious", "serious", "严肃"),
                    opt("pensive", "pensive", "沉思"),
                    opt("confident", "confident", "自信"),
                ],
            },
            Category {
                id: "clothing",
                name: Label::new("Clothing", "服装"),
                options: &[
                    NONE,
                    opt("business_suit", "tailored business suit", "商务西装"),
                    opt("casual", "casual streetwear", "休闲街头装"),
                    opt("evening_gown", "elegant evening gown", "晚礼服"),
                    opt("hanfu", "traditional hanfu", "汉服"),
                    opt("kimono", "kimono", "和服"),
                    opt("leather_jacket", "leather jacket", "皮夹克"),
                ],
            },
        ],
    },
    ControlGroup {
        id: GROUP_ENVIRONMENT,
        name: Label::new("Environment", "环境"),
        controls: &[
            Category {
                id: "location",
                name: Label::new("Location", "地点"),
                options: &[
                    NONE,
                    opt("studio", "minimalist photo studio", "极简摄影棚"),
                    opt("city_street", "busy city street", "城市街头"),
                    opt("cafe", "cozy cafe", "温馨咖啡馆"),
                    opt("forest", "misty forest", "雾气森林"),
                    opt("beach", "sunny beach", "阳光海滩"),
                    opt("library", "old library", "古老图书馆"),
                ],
            },
            Category {
                id: "lighting",
                name: Label::new("Lighting", "光线"),
                options: &[
                    NONE,
                    opt("golden_hour", "golden hour sunlight", "黄金时刻"),
                    opt("soft_window", "soft window light", "柔和窗光"),
                    opt("rembrandt", "Rembrandt lighting", "伦勃朗光"),
                    opt("neon", "neon lights", "霓虹灯光"),
                    opt("backlit", "dramatic backlight", "戏剧逆光"),
                ],
            },
            Category {
                id: "weather",
                name: Label::new("Weather", "天气"),
                options: &[
                    NONE,
                    opt("clear", "clear sky", "晴朗"),
                    opt("rain", "light rain", "小雨"),
                    opt("snow", "falling snow", "飘雪"),
                    opt("fog", "fog", "大雾"),
                ],
            },
        ],
    },
    ControlGroup {
        id: GROUP_STYLE,
        name: Label::new("Style", "风格"),
        controls: &[
            Category {
                id: CATEGORY_SHOT_TYPE,
                name: Label::new("Shot Type", "景别"),
                options: &[
                    NONE,
                    opt("close-up", "close-up", "特写"),
                    opt("headshot", "headshot", "头像"),
                    opt("half-body", "half-body portrait", "半身像"),
                    opt("full-body", "full-body portrait", "全身像"),
                ],
            },
            Category {
                id: "art_style",
                name: Label::new("Art Style", "艺术风格"),
                options: &[
                    NONE,
                    opt("cinematic", "cinematic", "电影感"),
                    opt("editorial", "fashion editorial", "时尚大片"),
                    opt("film_noir", "film noir", "黑色电影"),
                    opt("vintage", "vintage 1970s", "70年代复古"),
                    opt("fine_art", "fine art", "艺术摄影"),
                ],
            },
            Category {
                id: "color_tone",
                name: Label::new("Color Tone", "色调"),
                options: &[
                    NONE,
                    opt("warm", "warm tones", "暖色调"),
                    opt("cool", "cool tones", "冷色调"),
                    opt("monochrome", "black and white", "黑白"),
                    opt("pastel", "pastel colors", "马卡龙色"),
                ],
            },
        ],
    },
    ControlGroup {
        id: GROUP_PHOTOGRAPHY,
        name: Label::new("Photography", "摄影"),
        controls: &[
            Category {
                id: CATEGORY_POSE,
                name: Label::new("Pose", "姿势"),
                options: &[
                    NONE,
                    opt("looking_at_camera", "looking at camera", "看向镜头"),
                    opt("over_shoulder", "looking over the shoulder", "回眸"),
                    opt("arms_crossed", "arms crossed", "双臂交叉"),
                    opt("hand_on_chin", "hand on chin", "托腮"),
                    opt("walking", "walking", "行走"),
                ],
            },
            Category {
                id: "camera",
                name: Label::new("Camera", "相机"),
                options: &[
                    NONE,
                    opt("sony_a7r", "Sony A7R IV", "索尼 A7R IV"),
                    opt("canon_r5", "Canon EOS R5", "佳能 EOS R5"),
                    opt("leica_m11", "Leica M11", "徕卡 M11"),
                    opt("hasselblad", "Hasselblad X2D", "哈苏 X2D"),
                ],
            },
            Category {
                id: "lens",
                name: Label::new("Lens", "镜头"),
                options: &[
                    NONE,
                    opt("35mm", "35mm", "35mm"),
                    opt("50mm", "50mm", "50mm"),
                    opt("85mm", "85mm", "85mm"),
                    opt("135mm", "135mm", "135mm"),
                ],
            },
            Category {
                id: "aperture",
                name: Label::new("Aperture", "光圈"),
                options: &[
                    NONE,
                    opt("f1.2", "f/1.2", "f/1.2"),
                    opt("f1.8", "f/1.8", "f/1.8"),
                    opt("f2.8", "f/2.8", "f/2.8"),
                    opt("f8", "f/8", "f/8"),
                ],
            },
        ],
    },
];

pub fn all_categories() -> impl Iterator<Item = &'static Category> {
    CONTROL_GROUPS.iter().flat_map(|g| g.controls.iter())
}

pub fn find_category(id: &str) -> Option<&'static Category> {
    all_categories().find(|c| c.id == id)
}

pub fn find_group(id: &str) -> Option<&'static ControlGroup> {
    CONTROL_GROUPS.iter().find(|g| g.id == id)
}

/// English label of `value` in category `category_id`, if both exist.
pub fn english_label(category_id: &str, value: &str) -> Option<&'static str> {
    if value.is_empty() {
        return None;
    }
    find_category(category_id)
        .and_then(|c| c.option(value))
        .map(|o| o.label.en)
}
