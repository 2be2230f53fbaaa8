//! Value-code generation
//!
//! Turns a human label ("Trân châu đen") into the machine key stored on a
//! variant value ("tran_chau_den"). Unlike the URL slug helper used for
//! category handles, this one does not trim leading or trailing underscores;
//! the two must not be conflated.

/// Derive a normalized value code from a display label.
///
/// Lowercases the input, folds Vietnamese diacritic vowels to their base
/// Latin letter ("đ" to "d"), then maps every remaining character outside
/// `[a-z0-9]` to `_`. Total on any input; an all-symbol label yields a
/// string of underscores.
pub fn slugify(label: &str) -> String {
    label
        .to_lowercase()
        .chars()
        .map(fold_diacritic)
        .map(|c| match c {
            'a'..='z' | '0'..='9' => c,
            _ => '_',
        })
        .collect()
}

fn fold_diacritic(c: char) -> char {
    match c {
        'à' | 'á' | 'ạ' | 'ả' | 'ã' | 'â' | 'ầ' | 'ấ' | 'ậ' | 'ẩ' | 'ẫ' | 'ă' | 'ằ' | 'ắ'
        | 'ặ' | 'ẳ' | 'ẵ' => 'a',
        'è' | 'é' | 'ẹ' | 'ẻ' | 'ẽ' | 'ê' | 'ề' | 'ế' | 'ệ' | 'ể' | 'ễ' => 'e',
        'ì' | 'í' | 'ị' | 'ỉ' | 'ĩ' => 'i',
        'ò' | 'ó' | 'ọ' | 'ỏ' | 'õ' | 'ô' | 'ồ' | 'ố' | 'ộ' | 'ổ' | 'ỗ' | 'ơ' | 'ờ' | 'ớ'
        | 'ợ' | 'ở' | 'ỡ' => 'o',
        'ù' | 'ú' | 'ụ' | 'ủ' | 'ũ' | 'ư' | 'ừ' | 'ứ' | 'ự' | 'ử' | 'ữ' => 'u',
        'ỳ' | 'ý' | 'ỵ' | 'ỷ' | 'ỹ' => 'y',
        'đ' => 'd',
        _ => c,
    }
}
