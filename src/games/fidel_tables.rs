//! Static content tables for the letter-detail modal.
//! Glyph keyed; lookups are linear since every table is tiny.

/// Vowel suffix per form position (1st..7th order). The 6th order carries no
/// vowel. Applied uniformly to every family.
pub const VOWEL_ORDER: [&str; 7] = ["e", "u", "i", "a", "ie", "", "o"];

/// Letters with a dedicated recording, checked before the record's own forms.
pub const LETTER_AUDIO: &[(&str, &str)] = &[
    ("መ", "static/audio/me.mp3"),
    ("ሠ", "static/audio/se.mp3"),
    ("ረ", "static/audio/re.mp3"),
    ("ሸ", "static/audio/she.mp3"),
    ("ሀ", "static/audio/ha.mp3"),
    ("ለ", "static/audio/le.mp3"),
    ("ሐ", "static/audio/ha_alt.mp3"),
    ("ቀ", "static/audio/qe.mp3"),
    ("በ", "static/audio/be.mp3"),
];

/// Random pick when a form has no mapped audio.
pub const FALLBACK_SOUNDS: &[&str] = &["ha.mp3", "le.mp3", "me.mp3", "se.mp3"];

/// Example line shown under the enlarged glyph after a form is selected.
pub const FORM_EXAMPLES: &[(&str, &str)] = &[
    ("ሀ", "ሀገር (hager - country)"),
    ("ሁ", "ሁሉ (hulu - all)"),
    ("ሂ", "ሂሳብ (hisab - math)"),
    ("ሃ", "ሃይማኖት (haymanot - religion)"),
    ("ሄ", "ሄደ (hede - went)"),
    ("ህ", "ህይወት (hiyiwet - life)"),
    ("ሆ", "ሆድ (hod - stomach)"),
    ("ለ", "ለምለም (lemlem - green)"),
    ("ሉ", "ሉል (lul - pearl)"),
    ("ሊ", "ሊቅ (lik - scholar)"),
    ("ላ", "ላም (lam - cow)"),
    ("ሌ", "ሌሊት (lelit - night)"),
    ("ል", "ልብ (lib - heart)"),
    ("ሎ", "ሎሚ (lomi - lemon)"),
    ("ሐ", "ሐሳብ (hasab - thought)"),
    ("ሑ", "ሑረት (huret - freedom)"),
    ("ሒ", "ሒስ (his - scratch)"),
    ("ሓ", "ሓይል (hayil - power)"),
    ("ሔ", "ሔር (her - noble)"),
    ("ሕ", "ሕዝብ (hizb - people)"),
    ("ሖ", "ሖሳዕና (hosaina - hosanna)"),
    ("መ", "መኪና (mekina - car)"),
    ("ሙ", "ሙሉ (mulu - full)"),
    ("ሚ", "ሚስት (mist - wife)"),
    ("ማ", "ማር (mar - honey)"),
    ("ሜ", "ሜላ (mela - strategy)"),
    ("ም", "ምግብ (migib - food)"),
    ("ሞ", "ሞት (mot - death)"),
    ("ሠ", "ሠርግ (serg - wedding)"),
    ("ሡ", "ሡስ (sus - third)"),
    ("ሢ", "ሢ (si - sixty)"),
    ("ሣ", "ሣር (sar - grass)"),
    ("ሤ", "ሤጠ (sete - gave)"),
    ("ሥ", "ሥራ (sira - work)"),
    ("ሦ", "ሦስት (sost - three)"),
    ("ረ", "ረጅም (rejim - tall)"),
    ("ሩ", "ሩጫ (rucha - run)"),
    ("ሪ", "ሪዝ (riz - rice)"),
    ("ራ", "ራስ (ras - head)"),
    ("ሬ", "ሬት (ret - prize)"),
    ("ር", "ርጉብ (rigub - pigeon)"),
    ("ሮ", "ሮቤ (robe - mango)"),
    ("ሸ", "ሸቀጦች (sheketoch - goods)"),
    ("ሹ", "ሹሎ (shulo - piece)"),
    ("ሺ", "ሺ (shi - thousand)"),
    ("ሻ", "ሻሂ (shahi - tea)"),
    ("ሼ", "ሼህ (sheh - sheik)"),
    ("ሽ", "ሽታ (shita - smell)"),
    ("ሾ", "ሾፌር (shofer - driver)"),
    ("ቀ", "ቀለም (kelem - color)"),
    ("ቁ", "ቁጥር (kutir - number)"),
    ("ቂ", "ቂም (kim - grudge)"),
    ("ቃ", "ቃል (kal - word)"),
    ("ቄ", "ቄስ (kes - priest)"),
    ("ቅ", "ቅዳሜ (kidame - Saturday)"),
    ("ቆ", "ቆሎ (kolo - roasted grain)"),
];

/// Illustrative word for the example panel beside the enlarged glyph.
pub const PANEL_EXAMPLES: &[(&str, &str)] = &[
    ("ሀ", "ሀገር (hager - country)"),
    ("ሁ", "ሁለት (hulet - two)"),
    ("ሂ", "ሂሳብ (hisab - mathematics)"),
    ("ሃ", "ሃብት (habt - wealth)"),
    ("ሄ", "ሄደች (hedech - she went)"),
    ("ህ", "ህዝብ (hizb - people)"),
    ("ሆ", "ሆድ (hod - stomach)"),
    ("ለ", "ለምለም (lemlem - green)"),
    ("ሉ", "ሉል (lul - pearl)"),
    ("ሊ", "ሊቅ (liq - scholar)"),
    ("ላ", "ላም (lam - cow)"),
    ("ሌ", "ሌሊት (lelit - night)"),
    ("ል", "ልብ (lib - heart)"),
    ("ሎ", "ሎሚ (lomi - lemon)"),
    ("ሐ", "ሐሳብ (hasab - thought)"),
    ("ሑ", "ሑሩር (hurur - heat)"),
    ("ሒ", "ሒደት (hidet - process)"),
    ("ሓ", "ሓዘን (hazen - sadness)"),
    ("ሔ", "ሔዋን (hewan - animals)"),
    ("ሕ", "ሕይወት (hiwot - life)"),
    ("ሖ", "ሖሣዕና (hosana - hosanna)"),
    ("መ", "መኪና (mekina - car)"),
    ("ሙ", "ሙዚቃ (muzika - music)"),
    ("ሚ", "ሚስት (mist - wife)"),
    ("ማ", "ማር (mar - honey)"),
    ("ሜ", "ሜዳ (meda - field)"),
    ("ም", "ምግብ (migib - food)"),
    ("ሞ", "ሞት (mot - death)"),
];

pub const PANEL_DEFAULT: &str = "(example word)";

pub fn lookup(table: &'static [(&'static str, &'static str)], glyph: &str) -> Option<&'static str> {
    table.iter().find(|(g, _)| *g == glyph).map(|(_, v)| *v)
}
